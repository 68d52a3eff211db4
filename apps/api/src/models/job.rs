use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::lifecycle::{JobStatus, TransitionError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub alumni_id: Uuid,
    pub college_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: Option<String>,
    pub job_type: String,
    pub salary_range: Option<String>,
    pub skills: Vec<String>,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn status(&self) -> Result<JobStatus, TransitionError> {
        self.status.parse()
    }
}
