use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Actor;
use crate::errors::AppError;
use crate::lifecycle::{
    ApplicationEvent, InterviewStatus, RescheduleDecision, RescheduleProposal, RescheduleStatus,
    Role,
};
use crate::models::application::ApplicationRow;
use crate::models::interview::{InterviewContextRow, InterviewRow};
use crate::notify::{self, templates, EmailMessage, EmailNotifier};
use crate::placement::access::{ensure_application_owner, ensure_job_owner};
use crate::placement::applications::{fetch_application, fetch_with_job, transition_application};
use crate::placement::jobs::fetch_job;
use crate::placement::{concurrent_update, today};

/// SET clause that drops a student's reschedule proposal along with its reason.
pub(crate) const CLEAR_RESCHEDULE_REQUEST: &str = "requested_date = NULL, requested_time = NULL, \
     requested_mode = NULL, requested_location = NULL, reschedule_reason = NULL";

#[derive(Debug, Deserialize)]
pub struct ScheduleInterviewRequest {
    #[serde(flatten)]
    pub slot: RescheduleProposal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInterviewStatusRequest {
    pub status: InterviewStatus,
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    #[serde(flatten)]
    pub slot: RescheduleProposal,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleResponseRequest {
    pub decision: RescheduleDecision,
}

/// Result of an interview action that may also move the application and send mail.
#[derive(Debug, Serialize)]
pub struct InterviewOutcome {
    pub interview: InterviewRow,
    pub application: ApplicationRow,
    /// `None` when the action sends no email.
    pub email_sent: Option<bool>,
}

/// Books an interview for a shortlisted application.
/// Interview insert and application move commit together; the email goes out after.
pub async fn schedule(
    pool: &PgPool,
    notifier: &dyn EmailNotifier,
    actor: &Actor,
    application_id: Uuid,
    req: ScheduleInterviewRequest,
) -> Result<InterviewOutcome, AppError> {
    let (application, job) = fetch_with_job(pool, application_id).await?;
    ensure_job_owner(actor, &job)?;
    req.slot.validate(today())?;

    let mut tx = pool.begin().await?;
    let application =
        transition_application(&mut tx, &application, &ApplicationEvent::ScheduleInterview, actor.id)
            .await?;

    let interview = sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews
            (id, application_id, scheduled_date, scheduled_time, mode, location, notes, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(req.slot.date)
    .bind(req.slot.time)
    .bind(req.slot.mode.as_str())
    .bind(req.slot.location.as_deref().map(str::trim))
    .bind(req.notes.as_deref())
    .bind(InterviewStatus::Pending.as_str())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_insert(e, "this application already has an open interview"))?;

    tx.commit().await?;
    info!(
        "Interview {} scheduled for application {application_id} on {} {}",
        interview.id, interview.scheduled_date, interview.scheduled_time
    );

    let email_sent = send_after_commit(
        notifier,
        interview.id,
        fetch_context(pool, interview.id).await,
        |ctx| templates::interview_scheduled(ctx, &req.slot, req.notes.as_deref()),
    )
    .await;

    Ok(InterviewOutcome {
        interview,
        application,
        email_sent: Some(email_sent),
    })
}

/// Emails the student about a change that has already committed. Nothing here
/// can fail the request: a missing context, a template error or a rejected
/// send all come back as `false`.
async fn send_after_commit<F>(
    notifier: &dyn EmailNotifier,
    interview_id: Uuid,
    context: Result<InterviewContextRow, AppError>,
    compose: F,
) -> bool
where
    F: FnOnce(&InterviewContextRow) -> Result<EmailMessage, askama::Error>,
{
    let ctx = match context {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("Interview {interview_id}: could not load email recipient: {e}");
            return false;
        }
    };
    match compose(&ctx) {
        Ok(message) => notify::deliver(notifier, &message).await,
        Err(e) => {
            warn!("Interview {interview_id}: could not render email: {e}");
            false
        }
    }
}

pub async fn fetch_interview(pool: &PgPool, id: Uuid) -> Result<InterviewRow, AppError> {
    sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

async fn fetch_context(pool: &PgPool, interview_id: Uuid) -> Result<InterviewContextRow, AppError> {
    sqlx::query_as::<_, InterviewContextRow>(
        r#"
        SELECT i.id AS interview_id, a.id AS application_id, j.id AS job_id,
               j.title AS job_title, j.company, j.alumni_id, a.student_id,
               p.full_name AS student_name, p.email AS student_email
        FROM interviews i
        JOIN applications a ON a.id = i.application_id
        JOIN jobs j ON j.id = a.job_id
        JOIN profiles p ON p.id = a.student_id
        WHERE i.id = $1
        "#,
    )
    .bind(interview_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))
}

/// Interviews relevant to the actor.
pub async fn list(pool: &PgPool, actor: &Actor) -> Result<Vec<InterviewRow>, AppError> {
    let query = match actor.role {
        Role::Student => sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT i.* FROM interviews i
            JOIN applications a ON a.id = i.application_id
            WHERE a.student_id = $1
            ORDER BY i.scheduled_date, i.scheduled_time
            "#,
        )
        .bind(actor.id),
        Role::Alumni => sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT i.* FROM interviews i
            JOIN applications a ON a.id = i.application_id
            JOIN jobs j ON j.id = a.job_id
            WHERE j.alumni_id = $1
            ORDER BY i.scheduled_date, i.scheduled_time
            "#,
        )
        .bind(actor.id),
        Role::College => sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT i.* FROM interviews i
            JOIN applications a ON a.id = i.application_id
            JOIN jobs j ON j.id = a.job_id
            WHERE j.college_id = $1
            ORDER BY i.scheduled_date, i.scheduled_time
            "#,
        )
        .bind(actor.college_id),
        Role::Admin => sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews ORDER BY scheduled_date, scheduled_time",
        ),
    };
    Ok(query.fetch_all(pool).await?)
}

/// Moves an interview to a new status. Outcomes that decide the candidate
/// (selected, rejected, cancelled) move the application in the same transaction.
pub async fn update_status(
    pool: &PgPool,
    actor: &Actor,
    id: Uuid,
    req: UpdateInterviewStatusRequest,
) -> Result<InterviewOutcome, AppError> {
    let interview = fetch_interview(pool, id).await?;
    let application = fetch_application(pool, interview.application_id).await?;
    let job = fetch_job(pool, application.job_id).await?;
    ensure_job_owner(actor, &job)?;

    let next = interview
        .status()?
        .transition(req.status, interview.reschedule_status()?)?;
    let feedback = req
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());

    let mut tx = pool.begin().await?;
    let updated = sqlx::query_as::<_, InterviewRow>(
        r#"
        UPDATE interviews
        SET status = $1, feedback = COALESCE($2, feedback), updated_at = NOW()
        WHERE id = $3 AND status = $4 AND reschedule_status IS DISTINCT FROM 'pending'
        RETURNING *
        "#,
    )
    .bind(next.as_str())
    .bind(feedback)
    .bind(id)
    .bind(&interview.status)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| concurrent_update("interview"))?;

    let application = match next.application_event(feedback) {
        Some(event) => transition_application(&mut tx, &application, &event, actor.id).await?,
        None => application,
    };
    tx.commit().await?;

    info!(
        "Interview {id}: {} -> {next}; application {} now {}",
        interview.status, application.id, application.status
    );

    Ok(InterviewOutcome {
        interview: updated,
        application,
        email_sent: None,
    })
}

/// The student proposes a new slot. The interview keeps its current slot until
/// the recruiter accepts.
pub async fn request_reschedule(
    pool: &PgPool,
    actor: &Actor,
    id: Uuid,
    req: RescheduleRequest,
) -> Result<InterviewRow, AppError> {
    let interview = fetch_interview(pool, id).await?;
    let application = fetch_application(pool, interview.application_id).await?;
    ensure_application_owner(actor, &application)?;

    RescheduleStatus::request(
        interview.status()?,
        interview.reschedule_status()?,
        &req.slot,
        today(),
    )?;

    let updated = sqlx::query_as::<_, InterviewRow>(
        r#"
        UPDATE interviews
        SET requested_date = $1, requested_time = $2, requested_mode = $3,
            requested_location = $4, reschedule_reason = $5,
            reschedule_status = $6, updated_at = NOW()
        WHERE id = $7 AND status = 'pending'
          AND reschedule_status IS NOT DISTINCT FROM $8
        RETURNING *
        "#,
    )
    .bind(req.slot.date)
    .bind(req.slot.time)
    .bind(req.slot.mode.as_str())
    .bind(req.slot.location.as_deref().map(str::trim))
    .bind(req.reason.as_deref().map(str::trim))
    .bind(RescheduleStatus::Pending.as_str())
    .bind(id)
    .bind(interview.reschedule_status.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| concurrent_update("interview"))?;

    info!("Student {} requested reschedule of interview {id}", actor.id);
    Ok(updated)
}

/// The recruiter accepts (slot moves, student is emailed) or declines
/// (request cleared, slot unchanged).
pub async fn respond_to_reschedule(
    pool: &PgPool,
    notifier: &dyn EmailNotifier,
    actor: &Actor,
    id: Uuid,
    decision: RescheduleDecision,
) -> Result<InterviewOutcome, AppError> {
    let interview = fetch_interview(pool, id).await?;
    let application = fetch_application(pool, interview.application_id).await?;
    let job = fetch_job(pool, application.job_id).await?;
    ensure_job_owner(actor, &job)?;

    let next = RescheduleStatus::respond(interview.reschedule_status()?, decision)?;

    let updated = match decision {
        RescheduleDecision::Accept => {
            let slot = interview.requested_slot()?.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "interview {id} has a pending reschedule without a requested slot"
                ))
            })?;
            let sql = format!(
                r#"
                UPDATE interviews
                SET scheduled_date = $1, scheduled_time = $2, mode = $3, location = $4,
                    {CLEAR_RESCHEDULE_REQUEST}, reschedule_status = $5, updated_at = NOW()
                WHERE id = $6 AND reschedule_status = 'pending'
                RETURNING *
                "#
            );
            sqlx::query_as::<_, InterviewRow>(&sql)
            .bind(slot.date)
            .bind(slot.time)
            .bind(slot.mode.as_str())
            .bind(slot.location.as_deref())
            .bind(next.map(RescheduleStatus::as_str))
            .bind(id)
            .fetch_optional(pool)
            .await?
        }
        RescheduleDecision::Decline => {
            let sql = format!(
                r#"
                UPDATE interviews
                SET {CLEAR_RESCHEDULE_REQUEST}, reschedule_status = NULL, updated_at = NOW()
                WHERE id = $1 AND reschedule_status = 'pending'
                RETURNING *
                "#
            );
            sqlx::query_as::<_, InterviewRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
        }
    }
    .ok_or_else(|| concurrent_update("interview"))?;

    info!("Reschedule of interview {id} {:?} by {}", decision, actor.id);

    let email_sent = match decision {
        RescheduleDecision::Accept => {
            let slot = updated.slot()?;
            Some(
                send_after_commit(notifier, id, fetch_context(pool, id).await, |ctx| {
                    templates::interview_rescheduled(ctx, &slot)
                })
                .await,
            )
        }
        RescheduleDecision::Decline => None,
    };

    Ok(InterviewOutcome {
        interview: updated,
        application,
        email_sent,
    })
}
