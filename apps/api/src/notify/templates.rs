use askama::Template;

use crate::lifecycle::{InterviewMode, RescheduleProposal};
use crate::models::interview::InterviewContextRow;

use super::EmailMessage;

#[derive(Template)]
#[template(path = "emails/interview.html")]
struct InterviewEmail<'a> {
    student_name: &'a str,
    job_title: &'a str,
    company: &'a str,
    rescheduled: bool,
    date: String,
    time: String,
    mode_label: &'static str,
    location_label: &'static str,
    location: &'a str,
    notes: &'a str,
}

pub fn interview_scheduled(
    ctx: &InterviewContextRow,
    slot: &RescheduleProposal,
    notes: Option<&str>,
) -> Result<EmailMessage, askama::Error> {
    Ok(EmailMessage {
        to: ctx.student_email.clone(),
        to_name: ctx.student_name.clone(),
        subject: format!("Interview scheduled: {} at {}", ctx.job_title, ctx.company),
        html: render(ctx, slot, notes, false)?,
    })
}

pub fn interview_rescheduled(
    ctx: &InterviewContextRow,
    slot: &RescheduleProposal,
) -> Result<EmailMessage, askama::Error> {
    Ok(EmailMessage {
        to: ctx.student_email.clone(),
        to_name: ctx.student_name.clone(),
        subject: format!("Interview rescheduled: {} at {}", ctx.job_title, ctx.company),
        html: render(ctx, slot, None, true)?,
    })
}

fn render(
    ctx: &InterviewContextRow,
    slot: &RescheduleProposal,
    notes: Option<&str>,
    rescheduled: bool,
) -> Result<String, askama::Error> {
    let (mode_label, location_label) = match slot.mode {
        InterviewMode::Online => ("Online", "Meeting link"),
        InterviewMode::Offline => ("In person", "Venue"),
    };
    InterviewEmail {
        student_name: &ctx.student_name,
        job_title: &ctx.job_title,
        company: &ctx.company,
        rescheduled,
        date: slot.date.format("%A, %d %B %Y").to_string(),
        time: slot.time.format("%H:%M").to_string(),
        mode_label,
        location_label,
        location: slot.location.as_deref().map(str::trim).unwrap_or_default(),
        notes: notes.map(str::trim).unwrap_or_default(),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    fn ctx() -> InterviewContextRow {
        InterviewContextRow {
            interview_id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            job_title: "Backend <Intern>".to_string(),
            company: "Acme & Co".to_string(),
            alumni_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            student_name: "Asha".to_string(),
            student_email: "asha@example.edu".to_string(),
        }
    }

    fn slot(mode: InterviewMode, location: Option<&str>) -> RescheduleProposal {
        RescheduleProposal {
            date: NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            mode,
            location: location.map(str::to_string),
        }
    }

    #[test]
    fn test_scheduled_email_contains_slot_and_escapes() {
        let msg = interview_scheduled(
            &ctx(),
            &slot(InterviewMode::Online, Some("https://meet.example/abc")),
            Some("Bring your <portfolio>"),
        )
        .unwrap();
        assert_eq!(msg.to, "asha@example.edu");
        assert_eq!(msg.subject, "Interview scheduled: Backend <Intern> at Acme & Co");
        assert!(msg.html.contains("Backend &lt;Intern&gt;"));
        assert!(msg.html.contains("Acme &amp; Co"));
        assert!(msg.html.contains("Tuesday, 03 November 2026"));
        assert!(msg.html.contains("14:00"));
        assert!(msg.html.contains("Meeting link"));
        assert!(msg.html.contains("Bring your &lt;portfolio&gt;"));
    }

    #[test]
    fn test_rescheduled_email_for_offline_slot() {
        let msg =
            interview_rescheduled(&ctx(), &slot(InterviewMode::Offline, Some("Room 12"))).unwrap();
        assert!(msg.subject.starts_with("Interview rescheduled"));
        assert!(msg.html.contains("In person"));
        assert!(msg.html.contains("Venue"));
        assert!(msg.html.contains("was accepted"));
        assert!(!msg.html.contains("Notes from the recruiter"));
    }

    #[test]
    fn test_blank_location_row_is_omitted() {
        let msg = interview_scheduled(&ctx(), &slot(InterviewMode::Online, Some("  ")), None).unwrap();
        assert!(!msg.html.contains("Meeting link"));
        assert!(msg.html.contains("has been scheduled"));
    }
}
