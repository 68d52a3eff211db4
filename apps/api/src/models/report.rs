use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerReportRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub s3_key: String,
    pub public_url: String,
    pub career_score: i32,
    pub created_at: DateTime<Utc>,
}
