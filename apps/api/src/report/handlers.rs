//! Axum route handlers for career reports.

use axum::{extract::State, Json};

use crate::auth::Actor;
use crate::errors::AppError;
use crate::models::report::CareerReportRow;
use crate::report::generator::{
    generate_career_report, list_reports, GenerateReportRequest, GenerateReportResponse,
};
use crate::state::AppState;

/// POST /api/v1/reports
///
/// Generates (or returns the cached) career report for the acting user.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    actor: Actor,
    body: Option<Json<GenerateReportRequest>>,
) -> Result<Json<GenerateReportResponse>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    Ok(Json(generate_career_report(&state, actor.id, request).await?))
}

/// GET /api/v1/reports
pub async fn handle_list_reports(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<CareerReportRow>>, AppError> {
    Ok(Json(list_reports(&state, actor.id).await?))
}
