use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::lifecycle::{Role, TransitionError, VerificationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub college_id: Option<Uuid>,
    pub verification_status: String,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub graduation_year: Option<i32>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn role(&self) -> Result<Role, TransitionError> {
        self.role.parse()
    }

    pub fn verification(&self) -> Result<VerificationStatus, TransitionError> {
        self.verification_status.parse()
    }
}
