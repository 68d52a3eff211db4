//! Axum route handlers for colleges, profiles, jobs, applications and interviews.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Actor;
use crate::errors::AppError;
use crate::lifecycle::{ApplicationEvent, JobReview, VerificationDecision};
use crate::models::application::{ApplicationEventRow, ApplicationRow, ApplicationSummaryRow};
use crate::models::college::CollegeRow;
use crate::models::interview::InterviewRow;
use crate::models::job::JobRow;
use crate::models::profile::ProfileRow;
use crate::placement::applications::{self, ApplyRequest};
use crate::placement::colleges::{self, CreateCollegeRequest};
use crate::placement::interviews::{
    self, InterviewOutcome, RescheduleRequest, RescheduleResponseRequest,
    ScheduleInterviewRequest, UpdateInterviewStatusRequest,
};
use crate::placement::jobs::{self, CreateJobRequest};
use crate::placement::profiles::{self, CreateProfileRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CollegeListQuery {
    #[serde(default)]
    pub verified_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    pub decision: VerificationDecision,
}

#[derive(Debug, Deserialize)]
pub struct JobReviewRequest {
    pub decision: JobReview,
}

// ────────────────────────────────────────────────────────────────────────────
// Colleges
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/colleges
pub async fn handle_create_college(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateCollegeRequest>,
) -> Result<(StatusCode, Json<CollegeRow>), AppError> {
    let college = colleges::create_college(&state.db, &actor, req).await?;
    Ok((StatusCode::CREATED, Json(college)))
}

/// GET /api/v1/colleges
pub async fn handle_list_colleges(
    State(state): State<AppState>,
    Query(params): Query<CollegeListQuery>,
) -> Result<Json<Vec<CollegeRow>>, AppError> {
    Ok(Json(colleges::list_colleges(&state.db, params.verified_only).await?))
}

/// PATCH /api/v1/colleges/:id/verify
pub async fn handle_verify_college(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<CollegeRow>, AppError> {
    Ok(Json(colleges::verify_college(&state.db, &actor, id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileRow>), AppError> {
    let profile = profiles::create_profile(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(profiles::fetch_profile(&state.db, id).await?))
}

/// GET /api/v1/profiles/pending-alumni
pub async fn handle_pending_alumni(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<ProfileRow>>, AppError> {
    Ok(Json(profiles::list_pending_alumni(&state.db, &actor).await?))
}

/// PATCH /api/v1/profiles/:id/verification
pub async fn handle_decide_verification(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<VerificationRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(
        profiles::decide_verification(&state.db, &actor, id, req.decision).await?,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let job = jobs::create_job(&state.db, &actor, req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(jobs::list_jobs(&state.db, &actor).await?))
}

/// PATCH /api/v1/jobs/:id/review
pub async fn handle_review_job(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<JobReviewRequest>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(jobs::review_job(&state.db, &actor, id, req.decision).await?))
}

/// PATCH /api/v1/jobs/:id/close
pub async fn handle_close_job(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(jobs::close_job(&state.db, &actor, id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:id/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    actor: Actor,
    Path(job_id): Path<Uuid>,
    body: Option<Json<ApplyRequest>>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let application = applications::apply(&state.db, &actor, job_id, req).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_list_job_applications(
    State(state): State<AppState>,
    actor: Actor,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    Ok(Json(
        applications::list_for_job(&state.db, &actor, job_id).await?,
    ))
}

/// GET /api/v1/applications
pub async fn handle_list_my_applications(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<ApplicationSummaryRow>>, AppError> {
    Ok(Json(applications::list_mine(&state.db, &actor).await?))
}

/// PATCH /api/v1/applications/:id/status
///
/// Body: `{"action": "shortlist" | "unshortlist" | "accept"}` or
/// `{"action": "reject", "reason": "..."}`.
pub async fn handle_change_application_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(event): Json<ApplicationEvent>,
) -> Result<Json<ApplicationRow>, AppError> {
    Ok(Json(
        applications::change_status(&state.db, &actor, id, event).await?,
    ))
}

/// GET /api/v1/applications/:id/events
pub async fn handle_application_history(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationEventRow>>, AppError> {
    Ok(Json(applications::history(&state.db, &actor, id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Interviews
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications/:id/interviews
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    actor: Actor,
    Path(application_id): Path<Uuid>,
    Json(req): Json<ScheduleInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewOutcome>), AppError> {
    let outcome = interviews::schedule(
        &state.db,
        state.notifier.as_ref(),
        &actor,
        application_id,
        req,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /api/v1/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    Ok(Json(interviews::list(&state.db, &actor).await?))
}

/// PATCH /api/v1/interviews/:id/status
pub async fn handle_update_interview_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInterviewStatusRequest>,
) -> Result<Json<InterviewOutcome>, AppError> {
    Ok(Json(
        interviews::update_status(&state.db, &actor, id, req).await?,
    ))
}

/// POST /api/v1/interviews/:id/reschedule
pub async fn handle_request_reschedule(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<InterviewRow>, AppError> {
    Ok(Json(
        interviews::request_reschedule(&state.db, &actor, id, req).await?,
    ))
}

/// PATCH /api/v1/interviews/:id/reschedule
pub async fn handle_respond_reschedule(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<RescheduleResponseRequest>,
) -> Result<Json<InterviewOutcome>, AppError> {
    Ok(Json(
        interviews::respond_to_reschedule(
            &state.db,
            state.notifier.as_ref(),
            &actor,
            id,
            req.decision,
        )
        .await?,
    ))
}
