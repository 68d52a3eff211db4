use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::lifecycle::{ApplicationStatus, TransitionError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub student_id: Uuid,
    pub status: String,
    pub cover_letter: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    pub fn status(&self) -> Result<ApplicationStatus, TransitionError> {
        self.status.parse()
    }
}

/// Append-only audit trail of application status changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationEventRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor_id: Uuid,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An application joined with the job it targets, for student dashboards and reports.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationSummaryRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
