use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::Actor;
use crate::errors::AppError;
use crate::models::college::CollegeRow;

#[derive(Debug, Deserialize)]
pub struct CreateCollegeRequest {
    pub name: String,
    pub location: Option<String>,
}

pub async fn create_college(
    pool: &PgPool,
    actor: &Actor,
    req: CreateCollegeRequest,
) -> Result<CollegeRow, AppError> {
    actor.require_admin()?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("college name cannot be empty".to_string()));
    }

    let college = sqlx::query_as::<_, CollegeRow>(
        r#"
        INSERT INTO colleges (id, name, location, is_verified)
        VALUES ($1, $2, $3, FALSE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(req.location.as_deref().map(str::trim))
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_insert(e, &format!("college '{name}' already exists")))?;

    info!("Created college {} ({})", college.id, college.name);
    Ok(college)
}

pub async fn verify_college(pool: &PgPool, actor: &Actor, id: Uuid) -> Result<CollegeRow, AppError> {
    actor.require_admin()?;
    let college = sqlx::query_as::<_, CollegeRow>(
        "UPDATE colleges SET is_verified = TRUE WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("College {id} not found")))?;

    info!("College {id} verified by {}", actor.id);
    Ok(college)
}

pub async fn list_colleges(pool: &PgPool, verified_only: bool) -> Result<Vec<CollegeRow>, AppError> {
    Ok(sqlx::query_as::<_, CollegeRow>(
        "SELECT * FROM colleges WHERE ($1 = FALSE OR is_verified) ORDER BY name",
    )
    .bind(verified_only)
    .fetch_all(pool)
    .await?)
}

pub async fn fetch_college(pool: &PgPool, id: Uuid) -> Result<CollegeRow, AppError> {
    sqlx::query_as::<_, CollegeRow>("SELECT * FROM colleges WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("College {id} not found")))
}
