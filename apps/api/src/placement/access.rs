//! Who may do what. Pure checks over the acting user and the rows involved.

use crate::auth::Actor;
use crate::errors::AppError;
use crate::lifecycle::{Role, VerificationStatus};
use crate::models::application::ApplicationRow;
use crate::models::job::JobRow;
use crate::models::profile::ProfileRow;

fn forbidden(message: &str) -> AppError {
    AppError::Forbidden(message.to_string())
}

/// Only verified alumni attached to a college may post.
pub fn ensure_can_post_job(actor: &Actor) -> Result<(), AppError> {
    actor.require_role(Role::Alumni)?;
    if actor.verification != VerificationStatus::Verified {
        return Err(forbidden("alumni accounts must be verified before posting jobs"));
    }
    if actor.college_id.is_none() {
        return Err(forbidden("alumni account is not associated with a college"));
    }
    Ok(())
}

/// The job's college admin, or a platform admin.
pub fn ensure_can_review_job(actor: &Actor, job: &JobRow) -> Result<(), AppError> {
    if actor.is_admin() {
        return Ok(());
    }
    if actor.role == Role::College && actor.college_id == Some(job.college_id) {
        return Ok(());
    }
    Err(forbidden("only the job's college or a platform admin can review it"))
}

/// The alumni who posted the job, or a platform admin.
pub fn ensure_job_owner(actor: &Actor, job: &JobRow) -> Result<(), AppError> {
    if actor.is_admin() || (actor.role == Role::Alumni && actor.id == job.alumni_id) {
        return Ok(());
    }
    Err(forbidden("only the alumni who posted this job can manage it"))
}

/// Students see approved jobs of their own college only.
pub fn ensure_student_can_apply(actor: &Actor, job: &JobRow) -> Result<(), AppError> {
    actor.require_role(Role::Student)?;
    if actor.college_id != Some(job.college_id) {
        return Err(forbidden("this job is not open to students of your college"));
    }
    Ok(())
}

pub fn ensure_application_owner(actor: &Actor, application: &ApplicationRow) -> Result<(), AppError> {
    if actor.role == Role::Student && actor.id == application.student_id {
        return Ok(());
    }
    Err(forbidden("only the applicant can do this"))
}

/// Applicant, job owner, the job's college admin, or a platform admin.
pub fn ensure_can_view_application(
    actor: &Actor,
    application: &ApplicationRow,
    job: &JobRow,
) -> Result<(), AppError> {
    if ensure_application_owner(actor, application).is_ok()
        || ensure_job_owner(actor, job).is_ok()
        || ensure_can_review_job(actor, job).is_ok()
    {
        return Ok(());
    }
    Err(forbidden("you cannot view this application"))
}

/// Platform admins verify anyone; college admins verify alumni of their own college.
pub fn ensure_can_verify_profile(actor: &Actor, target: &ProfileRow) -> Result<(), AppError> {
    if target.role()? != Role::Alumni {
        return Err(AppError::Validation(
            "only alumni accounts go through verification".to_string(),
        ));
    }
    if actor.is_admin() {
        return Ok(());
    }
    if actor.role == Role::College && actor.college_id.is_some() && actor.college_id == target.college_id {
        return Ok(());
    }
    Err(forbidden("only a platform admin or the alumni's college can verify them"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::actor;
    use chrono::Utc;
    use uuid::Uuid;

    fn job(alumni_id: Uuid, college_id: Uuid) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            alumni_id,
            college_id,
            title: "SDE Intern".to_string(),
            company: "Acme".to_string(),
            description: "Build things".to_string(),
            location: None,
            job_type: "internship".to_string(),
            salary_range: None,
            skills: vec![],
            deadline: None,
            status: "approved".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn application(job_id: Uuid, student_id: Uuid) -> ApplicationRow {
        ApplicationRow {
            id: Uuid::new_v4(),
            job_id,
            student_id,
            status: "applied".to_string(),
            cover_letter: None,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn alumni_profile(college_id: Option<Uuid>) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            full_name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            role: "alumni".to_string(),
            college_id,
            verification_status: "pending".to_string(),
            company: Some("Acme".to_string()),
            designation: None,
            graduation_year: Some(2019),
            skills: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unverified_alumni_cannot_post() {
        let mut alumni = actor(Role::Alumni, Some(Uuid::new_v4()));
        assert!(ensure_can_post_job(&alumni).is_ok());
        alumni.verification = VerificationStatus::Pending;
        assert!(ensure_can_post_job(&alumni).is_err());
        assert!(ensure_can_post_job(&actor(Role::Student, Some(Uuid::new_v4()))).is_err());
        assert!(ensure_can_post_job(&actor(Role::Alumni, None)).is_err());
    }

    #[test]
    fn test_review_scoped_to_college() {
        let college = Uuid::new_v4();
        let j = job(Uuid::new_v4(), college);
        assert!(ensure_can_review_job(&actor(Role::College, Some(college)), &j).is_ok());
        assert!(ensure_can_review_job(&actor(Role::College, Some(Uuid::new_v4())), &j).is_err());
        assert!(ensure_can_review_job(&actor(Role::Admin, None), &j).is_ok());
        assert!(ensure_can_review_job(&actor(Role::Alumni, Some(college)), &j).is_err());
    }

    #[test]
    fn test_job_owner() {
        let owner = actor(Role::Alumni, Some(Uuid::new_v4()));
        let j = job(owner.id, owner.college_id.unwrap());
        assert!(ensure_job_owner(&owner, &j).is_ok());
        assert!(ensure_job_owner(&actor(Role::Alumni, owner.college_id), &j).is_err());
        assert!(ensure_job_owner(&actor(Role::Admin, None), &j).is_ok());
    }

    #[test]
    fn test_student_college_must_match() {
        let college = Uuid::new_v4();
        let j = job(Uuid::new_v4(), college);
        assert!(ensure_student_can_apply(&actor(Role::Student, Some(college)), &j).is_ok());
        assert!(ensure_student_can_apply(&actor(Role::Student, Some(Uuid::new_v4())), &j).is_err());
        assert!(ensure_student_can_apply(&actor(Role::Alumni, Some(college)), &j).is_err());
    }

    #[test]
    fn test_view_application() {
        let college = Uuid::new_v4();
        let owner = actor(Role::Alumni, Some(college));
        let student = actor(Role::Student, Some(college));
        let j = job(owner.id, college);
        let app = application(j.id, student.id);

        assert!(ensure_can_view_application(&student, &app, &j).is_ok());
        assert!(ensure_can_view_application(&owner, &app, &j).is_ok());
        assert!(ensure_can_view_application(&actor(Role::College, Some(college)), &app, &j).is_ok());
        assert!(ensure_can_view_application(&actor(Role::Student, Some(college)), &app, &j).is_err());
    }

    #[test]
    fn test_verify_profile_scope() {
        let college = Uuid::new_v4();
        let target = alumni_profile(Some(college));
        assert!(ensure_can_verify_profile(&actor(Role::Admin, None), &target).is_ok());
        assert!(ensure_can_verify_profile(&actor(Role::College, Some(college)), &target).is_ok());
        assert!(ensure_can_verify_profile(&actor(Role::College, Some(Uuid::new_v4())), &target).is_err());

        let mut student = alumni_profile(Some(college));
        student.role = "student".to_string();
        assert!(matches!(
            ensure_can_verify_profile(&actor(Role::Admin, None), &student),
            Err(AppError::Validation(_))
        ));
    }
}
