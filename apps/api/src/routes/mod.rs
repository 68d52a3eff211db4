pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::placement::handlers;
use crate::report::handlers as report_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Colleges
        .route(
            "/api/v1/colleges",
            post(handlers::handle_create_college).get(handlers::handle_list_colleges),
        )
        .route(
            "/api/v1/colleges/:id/verify",
            patch(handlers::handle_verify_college),
        )
        // Profiles
        .route("/api/v1/profiles", post(handlers::handle_create_profile))
        .route(
            "/api/v1/profiles/pending-alumni",
            get(handlers::handle_pending_alumni),
        )
        .route("/api/v1/profiles/:id", get(handlers::handle_get_profile))
        .route(
            "/api/v1/profiles/:id/verification",
            patch(handlers::handle_decide_verification),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            post(handlers::handle_create_job).get(handlers::handle_list_jobs),
        )
        .route("/api/v1/jobs/:id/review", patch(handlers::handle_review_job))
        .route("/api/v1/jobs/:id/close", patch(handlers::handle_close_job))
        .route(
            "/api/v1/jobs/:id/applications",
            post(handlers::handle_apply).get(handlers::handle_list_job_applications),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(handlers::handle_list_my_applications),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(handlers::handle_change_application_status),
        )
        .route(
            "/api/v1/applications/:id/events",
            get(handlers::handle_application_history),
        )
        .route(
            "/api/v1/applications/:id/interviews",
            post(handlers::handle_schedule_interview),
        )
        // Interviews
        .route("/api/v1/interviews", get(handlers::handle_list_interviews))
        .route(
            "/api/v1/interviews/:id/status",
            patch(handlers::handle_update_interview_status),
        )
        .route(
            "/api/v1/interviews/:id/reschedule",
            post(handlers::handle_request_reschedule).patch(handlers::handle_respond_reschedule),
        )
        // Career reports
        .route(
            "/api/v1/reports",
            post(report_handlers::handle_generate_report).get(report_handlers::handle_list_reports),
        )
        .with_state(state)
}
