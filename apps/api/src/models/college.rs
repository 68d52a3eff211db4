use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollegeRow {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
