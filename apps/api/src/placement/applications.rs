use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::Actor;
use crate::db::Tx;
use crate::errors::AppError;
use crate::lifecycle::{ApplicationEvent, ApplicationStatus, InterviewStatus, Role};
use crate::models::application::{ApplicationEventRow, ApplicationRow, ApplicationSummaryRow};
use crate::models::job::JobRow;
use crate::placement::access::{
    ensure_can_view_application, ensure_job_owner, ensure_student_can_apply,
};
use crate::placement::interviews::CLEAR_RESCHEDULE_REQUEST;
use crate::placement::jobs::fetch_job;
use crate::placement::{concurrent_update, today};

#[derive(Debug, Default, Deserialize)]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
}

pub async fn apply(
    pool: &PgPool,
    actor: &Actor,
    job_id: Uuid,
    req: ApplyRequest,
) -> Result<ApplicationRow, AppError> {
    let job = fetch_job(pool, job_id).await?;
    ensure_student_can_apply(actor, &job)?;
    if !job.status()?.accepts_applications() {
        return Err(AppError::Conflict(format!(
            "job {job_id} is {} and not accepting applications",
            job.status
        )));
    }
    if job.deadline.is_some_and(|d| d < today()) {
        return Err(AppError::Conflict(format!(
            "the application deadline for job {job_id} has passed"
        )));
    }

    let mut tx = pool.begin().await?;
    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (id, job_id, student_id, status, cover_letter)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(actor.id)
    .bind(ApplicationStatus::Applied.as_str())
    .bind(req.cover_letter.as_deref().map(str::trim))
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_insert(e, "you have already applied to this job"))?;

    record_event(&mut tx, application.id, None, ApplicationStatus::Applied, actor.id, None).await?;
    tx.commit().await?;

    info!("Student {} applied to job {job_id}", actor.id);
    Ok(application)
}

pub async fn fetch_application(pool: &PgPool, id: Uuid) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// Loads an application together with its job.
pub async fn fetch_with_job(pool: &PgPool, id: Uuid) -> Result<(ApplicationRow, JobRow), AppError> {
    let application = fetch_application(pool, id).await?;
    let job = fetch_job(pool, application.job_id).await?;
    Ok((application, job))
}

/// A recruiter action on an application (shortlist, unshortlist, accept, reject).
/// Deciding an application that has an interview scheduled also closes that
/// interview, in the same transaction.
pub async fn change_status(
    pool: &PgPool,
    actor: &Actor,
    id: Uuid,
    event: ApplicationEvent,
) -> Result<ApplicationRow, AppError> {
    if !matches!(
        event,
        ApplicationEvent::Shortlist
            | ApplicationEvent::Unshortlist
            | ApplicationEvent::Accept
            | ApplicationEvent::Reject { .. }
    ) {
        return Err(AppError::Validation(format!(
            "'{}' is driven by the interview flow",
            event.name()
        )));
    }

    let (application, job) = fetch_with_job(pool, id).await?;
    ensure_job_owner(actor, &job)?;

    let change = application.status()?.apply(&event)?;

    let mut tx = pool.begin().await?;
    let updated = transition_application(&mut tx, &application, &event, actor.id).await?;
    if let Some(outcome) = change.closes_interview() {
        let closed =
            close_open_interview(&mut tx, id, outcome, change.rejection_reason.as_deref()).await?;
        info!("Application {id}: closed {closed} open interview(s) as {outcome}");
    }
    tx.commit().await?;

    info!(
        "Application {id}: {} -> {} ({}) by {}",
        application.status,
        updated.status,
        event.name(),
        actor.id
    );
    Ok(updated)
}

/// Moves the application's open interview (pending or completed) to `outcome`
/// and drops any outstanding reschedule request.
async fn close_open_interview(
    tx: &mut Tx<'_>,
    application_id: Uuid,
    outcome: InterviewStatus,
    feedback: Option<&str>,
) -> Result<u64, AppError> {
    let sql = format!(
        r#"
        UPDATE interviews
        SET status = $1, feedback = COALESCE($2, feedback),
            {CLEAR_RESCHEDULE_REQUEST}, reschedule_status = NULL, updated_at = NOW()
        WHERE application_id = $3 AND status IN ($4, $5)
        "#
    );
    let result = sqlx::query(&sql)
    .bind(outcome.as_str())
    .bind(feedback)
    .bind(application_id)
    .bind(InterviewStatus::Pending.as_str())
    .bind(InterviewStatus::Completed.as_str())
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}

/// Applies `event` inside `tx` with a compare-and-set on the stored status and
/// appends to the audit trail. No-op transitions write nothing.
pub async fn transition_application(
    tx: &mut Tx<'_>,
    application: &ApplicationRow,
    event: &ApplicationEvent,
    actor_id: Uuid,
) -> Result<ApplicationRow, AppError> {
    let change = application.status()?.apply(event)?;
    if change.is_noop() {
        return Ok(application.clone());
    }

    let updated = sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET status = $1, rejection_reason = $2, updated_at = NOW()
        WHERE id = $3 AND status = $4
        RETURNING *
        "#,
    )
    .bind(change.to.as_str())
    .bind(change.rejection_reason.as_deref())
    .bind(application.id)
    .bind(&application.status)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| concurrent_update("application"))?;

    record_event(
        tx,
        application.id,
        Some(change.from),
        change.to,
        actor_id,
        change.rejection_reason.as_deref(),
    )
    .await?;

    Ok(updated)
}

async fn record_event(
    tx: &mut Tx<'_>,
    application_id: Uuid,
    from: Option<ApplicationStatus>,
    to: ApplicationStatus,
    actor_id: Uuid,
    reason: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO application_events (id, application_id, from_status, to_status, actor_id, reason)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(from.map(ApplicationStatus::as_str))
    .bind(to.as_str())
    .bind(actor_id)
    .bind(reason)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn list_for_job(pool: &PgPool, actor: &Actor, job_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
    let job = fetch_job(pool, job_id).await?;
    ensure_job_owner(actor, &job)?;
    Ok(sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE job_id = $1 ORDER BY created_at",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}

/// The student's own applications with job titles.
pub async fn list_for_student(pool: &PgPool, student_id: Uuid) -> Result<Vec<ApplicationSummaryRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationSummaryRow>(
        r#"
        SELECT a.id, a.job_id, j.title AS job_title, j.company, a.status,
               a.rejection_reason, a.created_at
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.student_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_mine(pool: &PgPool, actor: &Actor) -> Result<Vec<ApplicationSummaryRow>, AppError> {
    actor.require_role(Role::Student)?;
    list_for_student(pool, actor.id).await
}

pub async fn history(pool: &PgPool, actor: &Actor, id: Uuid) -> Result<Vec<ApplicationEventRow>, AppError> {
    let (application, job) = fetch_with_job(pool, id).await?;
    ensure_can_view_application(actor, &application, &job)?;
    Ok(sqlx::query_as::<_, ApplicationEventRow>(
        "SELECT * FROM application_events WHERE application_id = $1 ORDER BY created_at, id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?)
}
