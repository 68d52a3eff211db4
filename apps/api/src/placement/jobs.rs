use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::Actor;
use crate::errors::AppError;
use crate::lifecycle::{JobReview, JobStatus, Role};
use crate::models::job::JobRow;
use crate::placement::access::{ensure_can_post_job, ensure_can_review_job, ensure_job_owner};
use crate::placement::{concurrent_update, today};

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: Option<String>,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    pub salary_range: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub deadline: Option<NaiveDate>,
}

fn default_job_type() -> String {
    "full_time".to_string()
}

impl CreateJobRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        if let Some(deadline) = self.deadline {
            if deadline < today {
                return Err(AppError::Validation(format!(
                    "deadline {deadline} is in the past"
                )));
            }
        }
        Ok(())
    }
}

/// New postings start `pending` and are invisible to students until reviewed.
pub async fn create_job(pool: &PgPool, actor: &Actor, req: CreateJobRequest) -> Result<JobRow, AppError> {
    ensure_can_post_job(actor)?;
    req.validate(today())?;
    let college_id = actor
        .college_id
        .ok_or_else(|| AppError::Forbidden("alumni account has no college".to_string()))?;

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (id, alumni_id, college_id, title, company, description, location,
             job_type, salary_range, skills, deadline, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor.id)
    .bind(college_id)
    .bind(req.title.trim())
    .bind(req.company.trim())
    .bind(req.description.trim())
    .bind(req.location.as_deref())
    .bind(req.job_type.trim())
    .bind(req.salary_range.as_deref())
    .bind(&req.skills)
    .bind(req.deadline)
    .bind(JobStatus::Pending.as_str())
    .fetch_one(pool)
    .await?;

    info!("Alumni {} posted job {} for college {}", actor.id, job.id, college_id);
    Ok(job)
}

pub async fn fetch_job(pool: &PgPool, id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn review_job(
    pool: &PgPool,
    actor: &Actor,
    id: Uuid,
    review: JobReview,
) -> Result<JobRow, AppError> {
    let job = fetch_job(pool, id).await?;
    ensure_can_review_job(actor, &job)?;
    let next = job.status()?.review(review)?;
    let updated = set_job_status(pool, &job, next).await?;
    info!("Job {id} {} by {}", next, actor.id);
    Ok(updated)
}

pub async fn close_job(pool: &PgPool, actor: &Actor, id: Uuid) -> Result<JobRow, AppError> {
    let job = fetch_job(pool, id).await?;
    ensure_job_owner(actor, &job)?;
    let next = job.status()?.close()?;
    let updated = set_job_status(pool, &job, next).await?;
    info!("Job {id} closed by {}", actor.id);
    Ok(updated)
}

async fn set_job_status(pool: &PgPool, job: &JobRow, next: JobStatus) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET status = $1, updated_at = NOW()
        WHERE id = $2 AND status = $3
        RETURNING *
        "#,
    )
    .bind(next.as_str())
    .bind(job.id)
    .bind(&job.status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| concurrent_update("job"))
}

/// Jobs visible to the actor:
/// students see approved jobs of their college, alumni their own postings,
/// college admins every job of their college, platform admins everything.
pub async fn list_jobs(pool: &PgPool, actor: &Actor) -> Result<Vec<JobRow>, AppError> {
    let query = match actor.role {
        Role::Student => sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE college_id = $1 AND status = 'approved'
              AND (deadline IS NULL OR deadline >= CURRENT_DATE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(actor.college_id),
        Role::Alumni => {
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE alumni_id = $1 ORDER BY created_at DESC")
                .bind(actor.id)
        }
        Role::College => {
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE college_id = $1 ORDER BY created_at DESC")
                .bind(actor.college_id)
        }
        Role::Admin => sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC"),
    };
    Ok(query.fetch_all(pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateJobRequest {
        CreateJobRequest {
            title: "Graduate Engineer".to_string(),
            company: "Acme".to_string(),
            description: "Work on payments".to_string(),
            location: Some("Bengaluru".to_string()),
            job_type: default_job_type(),
            salary_range: None,
            skills: vec!["rust".to_string()],
            deadline: None,
        }
    }

    #[test]
    fn test_valid_job_request() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert!(request().validate(today).is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let mut req = request();
        req.company = "  ".to_string();
        let err = req.validate(today).unwrap_err();
        assert!(err.to_string().contains("company"));
    }

    #[test]
    fn test_past_deadline_rejected() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let mut req = request();
        req.deadline = NaiveDate::from_ymd_opt(2026, 1, 9);
        assert!(req.validate(today).is_err());
        req.deadline = Some(today);
        assert!(req.validate(today).is_ok());
    }

    #[test]
    fn test_job_type_defaults() {
        let req: CreateJobRequest = serde_json::from_value(serde_json::json!({
            "title": "Intern",
            "company": "Acme",
            "description": "Summer internship"
        }))
        .unwrap();
        assert_eq!(req.job_type, "full_time");
        assert!(req.skills.is_empty());
    }
}
