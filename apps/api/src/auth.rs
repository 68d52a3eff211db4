//! Resolves the acting user for a request.
//!
//! Sign-in lives in the managed identity provider; by the time a request
//! reaches this service the gateway has put the user's profile id in
//! `x-user-id`. The profile row supplies the role and college used for every
//! permission check.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::lifecycle::{Role, VerificationStatus};
use crate::models::profile::ProfileRow;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub college_id: Option<Uuid>,
    pub verification: VerificationStatus,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "this action requires the {role} role"
            )))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_role(Role::Admin)
    }
}

impl TryFrom<&ProfileRow> for Actor {
    type Error = AppError;

    fn try_from(profile: &ProfileRow) -> Result<Self, Self::Error> {
        Ok(Actor {
            id: profile.id,
            role: profile.role()?,
            college_id: profile.college_id,
            verification: profile.verification()?,
        })
    }
}

pub fn actor_id_from_headers(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Unauthorized)
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = actor_id_from_headers(&parts.headers)?;
        let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Actor::try_from(&profile)
    }
}

#[cfg(test)]
pub(crate) fn actor(role: Role, college_id: Option<Uuid>) -> Actor {
    Actor {
        id: Uuid::new_v4(),
        role,
        college_id,
        verification: VerificationStatus::Verified,
    }
}
