//! Collects everything the report is allowed to talk about.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::lifecycle::{ApplicationStatus, InterviewStatus};
use crate::placement::profiles::fetch_profile;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationRecord {
    pub job_title: String,
    pub company: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub had_interview: bool,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InterviewRecord {
    pub job_title: String,
    pub company: String,
    pub scheduled_date: NaiveDate,
    pub mode: String,
    pub status: String,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlacementStats {
    pub total_applications: u32,
    /// Applications that got past the first screen.
    pub progressed: u32,
    pub interviews: u32,
    pub offers: u32,
    pub rejections: u32,
    pub open: u32,
    pub shortlist_rate: f64,
    pub offer_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportInput {
    pub user_id: Uuid,
    pub full_name: String,
    pub role: String,
    pub college: Option<String>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub graduation_year: Option<i32>,
    pub skills: Vec<String>,
    pub applications: Vec<ApplicationRecord>,
    pub interviews: Vec<InterviewRecord>,
    pub stats: PlacementStats,
}

pub fn compute_stats(applications: &[ApplicationRecord], interviews: &[InterviewRecord]) -> PlacementStats {
    let mut stats = PlacementStats {
        total_applications: applications.len() as u32,
        interviews: interviews
            .iter()
            .filter(|i| i.status.parse::<InterviewStatus>() != Ok(InterviewStatus::Cancelled))
            .count() as u32,
        ..PlacementStats::default()
    };

    for app in applications {
        let Ok(status) = app.status.parse::<ApplicationStatus>() else {
            continue;
        };
        match status {
            ApplicationStatus::Accepted => stats.offers += 1,
            ApplicationStatus::Rejected => stats.rejections += 1,
            _ => stats.open += 1,
        }
        let progressed = app.had_interview
            || matches!(
                status,
                ApplicationStatus::Shortlisted
                    | ApplicationStatus::InterviewScheduled
                    | ApplicationStatus::Accepted
            );
        if progressed {
            stats.progressed += 1;
        }
    }

    if stats.total_applications > 0 {
        let total = f64::from(stats.total_applications);
        stats.shortlist_rate = round2(f64::from(stats.progressed) / total);
        stats.offer_rate = round2(f64::from(stats.offers) / total);
    }
    stats
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub async fn load_report_input(pool: &PgPool, user_id: Uuid) -> Result<ReportInput, AppError> {
    let profile = fetch_profile(pool, user_id).await?;

    let college: Option<String> = match profile.college_id {
        Some(id) => {
            sqlx::query_scalar("SELECT name FROM colleges WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };

    let applications = sqlx::query_as::<_, ApplicationRecord>(
        r#"
        SELECT j.title AS job_title, j.company, a.status, a.rejection_reason,
               EXISTS (SELECT 1 FROM interviews i WHERE i.application_id = a.id) AS had_interview,
               a.created_at AS applied_at
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.student_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let interviews = sqlx::query_as::<_, InterviewRecord>(
        r#"
        SELECT j.title AS job_title, j.company, i.scheduled_date, i.mode, i.status, i.feedback
        FROM interviews i
        JOIN applications a ON a.id = i.application_id
        JOIN jobs j ON j.id = a.job_id
        WHERE a.student_id = $1
        ORDER BY i.scheduled_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let stats = compute_stats(&applications, &interviews);

    Ok(ReportInput {
        user_id,
        full_name: profile.full_name,
        role: profile.role,
        college,
        company: profile.company,
        designation: profile.designation,
        graduation_year: profile.graduation_year,
        skills: profile.skills,
        applications,
        interviews,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(status: &str, had_interview: bool) -> ApplicationRecord {
        ApplicationRecord {
            job_title: "SDE".to_string(),
            company: "Acme".to_string(),
            status: status.to_string(),
            rejection_reason: None,
            had_interview,
            applied_at: Utc::now(),
        }
    }

    fn interview(status: &str) -> InterviewRecord {
        InterviewRecord {
            job_title: "SDE".to_string(),
            company: "Acme".to_string(),
            scheduled_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            mode: "online".to_string(),
            status: status.to_string(),
            feedback: None,
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats, PlacementStats::default());
    }

    #[test]
    fn test_counts_and_rates() {
        let apps = vec![
            app("applied", false),
            app("pending", false),
            app("shortlisted", false),
            app("accepted", true),
            app("rejected", true),
            app("rejected", false),
        ];
        let interviews = vec![interview("selected"), interview("rejected"), interview("cancelled")];
        let stats = compute_stats(&apps, &interviews);

        assert_eq!(stats.total_applications, 6);
        assert_eq!(stats.offers, 1);
        assert_eq!(stats.rejections, 2);
        assert_eq!(stats.open, 3);
        // shortlisted, accepted, and the rejection that reached interview
        assert_eq!(stats.progressed, 3);
        assert_eq!(stats.interviews, 2);
        assert_eq!(stats.shortlist_rate, 0.5);
        assert_eq!(stats.offer_rate, 0.17);
    }

    #[test]
    fn test_unknown_status_is_skipped() {
        let stats = compute_stats(&[app("withdrawn", false)], &[]);
        assert_eq!(stats.total_applications, 1);
        assert_eq!(stats.open, 0);
    }
}
