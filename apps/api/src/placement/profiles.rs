use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::Actor;
use crate::errors::AppError;
use crate::lifecycle::{Role, VerificationDecision, VerificationStatus};
use crate::models::profile::ProfileRow;
use crate::placement::access::ensure_can_verify_profile;
use crate::placement::colleges::fetch_college;
use crate::placement::concurrent_update;

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    /// Identity-provider user id; becomes the profile id.
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub college_id: Option<Uuid>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateProfileRequest {
    /// Checks the request in isolation and returns the verification status the
    /// new profile starts in.
    pub fn validate(&self) -> Result<VerificationStatus, AppError> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("full_name cannot be empty".to_string()));
        }
        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(AppError::Validation(format!("'{email}' is not a valid email")));
        }
        match self.role {
            Role::Admin => Err(AppError::Forbidden(
                "admin accounts cannot be self-registered".to_string(),
            )),
            Role::Student | Role::College | Role::Alumni if self.college_id.is_none() => Err(
                AppError::Validation(format!("a {} profile needs a college_id", self.role)),
            ),
            Role::Alumni => Ok(VerificationStatus::Pending),
            Role::Student | Role::College => Ok(VerificationStatus::Verified),
        }
    }
}

pub async fn create_profile(pool: &PgPool, req: CreateProfileRequest) -> Result<ProfileRow, AppError> {
    let verification = req.validate()?;
    if let Some(college_id) = req.college_id {
        fetch_college(pool, college_id).await?;
    }

    let skills: Vec<String> = req
        .skills
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let profile = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (id, full_name, email, role, college_id, verification_status,
             company, designation, graduation_year, skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(req.id)
    .bind(req.full_name.trim())
    .bind(req.email.trim().to_lowercase())
    .bind(req.role.as_str())
    .bind(req.college_id)
    .bind(verification.as_str())
    .bind(req.company.as_deref())
    .bind(req.designation.as_deref())
    .bind(req.graduation_year)
    .bind(&skills)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_insert(e, "a profile with this id or email already exists"))?;

    info!("Created {} profile {}", profile.role, profile.id);
    Ok(profile)
}

pub async fn fetch_profile(pool: &PgPool, id: Uuid) -> Result<ProfileRow, AppError> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))
}

pub async fn decide_verification(
    pool: &PgPool,
    actor: &Actor,
    id: Uuid,
    decision: VerificationDecision,
) -> Result<ProfileRow, AppError> {
    let target = fetch_profile(pool, id).await?;
    ensure_can_verify_profile(actor, &target)?;
    let next = target.verification()?.decide(decision)?;

    let updated = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET verification_status = $1
        WHERE id = $2 AND verification_status = $3
        RETURNING *
        "#,
    )
    .bind(next.as_str())
    .bind(id)
    .bind(&target.verification_status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| concurrent_update("profile"))?;

    info!("Alumni {id} verification -> {next} by {}", actor.id);
    Ok(updated)
}

/// Alumni awaiting verification, scoped to the actor's college unless admin.
pub async fn list_pending_alumni(pool: &PgPool, actor: &Actor) -> Result<Vec<ProfileRow>, AppError> {
    let college_scope = match actor.role {
        Role::Admin => None,
        Role::College => Some(actor.college_id.ok_or_else(|| {
            AppError::Forbidden("college account is not linked to a college".to_string())
        })?),
        _ => {
            return Err(AppError::Forbidden(
                "only admins can list pending alumni".to_string(),
            ))
        }
    };

    Ok(sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT * FROM profiles
        WHERE role IN ('alumni', 'startup')
          AND verification_status = 'pending'
          AND ($1::uuid IS NULL OR college_id = $1)
        ORDER BY created_at
        "#,
    )
    .bind(college_scope)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: Role, college_id: Option<Uuid>) -> CreateProfileRequest {
        CreateProfileRequest {
            id: Uuid::new_v4(),
            full_name: "Meera Iyer".to_string(),
            email: "meera@college.edu".to_string(),
            role,
            college_id,
            company: None,
            designation: None,
            graduation_year: Some(2026),
            skills: vec![],
        }
    }

    #[test]
    fn test_alumni_start_pending() {
        let status = request(Role::Alumni, Some(Uuid::new_v4())).validate().unwrap();
        assert_eq!(status, VerificationStatus::Pending);
    }

    #[test]
    fn test_students_start_verified() {
        let status = request(Role::Student, Some(Uuid::new_v4())).validate().unwrap();
        assert_eq!(status, VerificationStatus::Verified);
    }

    #[test]
    fn test_admin_cannot_self_register() {
        assert!(matches!(
            request(Role::Admin, None).validate(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_college_required() {
        assert!(matches!(
            request(Role::Student, None).validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_email_shape() {
        let mut req = request(Role::Student, Some(Uuid::new_v4()));
        req.email = "meera@localhost".to_string();
        assert!(req.validate().is_err());
        req.email = "@college.edu".to_string();
        assert!(req.validate().is_err());
    }
}
