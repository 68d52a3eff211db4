//! Renders a career report as a self-contained HTML page through the
//! `career_report.html` template. Askama escapes every interpolated value.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::report::aggregate::ReportInput;
use crate::report::generator::{CareerReport, RoleSuggestion};

#[derive(Template)]
#[template(path = "career_report.html")]
struct CareerReportPage<'a> {
    full_name: &'a str,
    college: &'a str,
    generated_on: String,
    score: i32,
    band: &'static str,
    summary: &'a str,
    stats: Vec<StatRow>,
    strengths: &'a [String],
    improvement_areas: &'a [String],
    roles: &'a [RoleSuggestion],
    action_plan: Vec<ActionLine<'a>>,
    applications: Vec<ApplicationLine<'a>>,
}

struct StatRow {
    label: &'static str,
    value: String,
}

struct ActionLine<'a> {
    step: &'a str,
    timeframe: &'a str,
}

struct ApplicationLine<'a> {
    job_title: &'a str,
    company: &'a str,
    status: String,
    applied_on: String,
}

pub fn render_report_html(
    input: &ReportInput,
    report: &CareerReport,
    generated_at: DateTime<Utc>,
) -> Result<String, askama::Error> {
    let score = report.score();
    let band = match score {
        70.. => "high",
        40..=69 => "mid",
        _ => "low",
    };

    let stats = &input.stats;
    let stats = vec![
        stat("Applications", stats.total_applications.to_string()),
        stat("Shortlisted or further", stats.progressed.to_string()),
        stat("Interviews", stats.interviews.to_string()),
        stat("Offers", stats.offers.to_string()),
        stat("Shortlist rate", percent(stats.shortlist_rate)),
        stat("Offer rate", percent(stats.offer_rate)),
    ];

    let page = CareerReportPage {
        full_name: &input.full_name,
        college: input.college.as_deref().unwrap_or_default(),
        generated_on: generated_at.format("%d %b %Y").to_string(),
        score,
        band,
        summary: &report.summary,
        stats,
        strengths: &report.strengths,
        improvement_areas: &report.improvement_areas,
        roles: &report.recommended_roles,
        action_plan: report
            .action_plan
            .iter()
            .map(|a| ActionLine {
                step: &a.step,
                timeframe: a.timeframe.as_deref().map(str::trim).unwrap_or_default(),
            })
            .collect(),
        applications: input
            .applications
            .iter()
            .map(|a| ApplicationLine {
                job_title: &a.job_title,
                company: &a.company,
                status: a.status.replace('_', " "),
                applied_on: a.applied_at.format("%d %b %Y").to_string(),
            })
            .collect(),
    };
    page.render()
}

fn stat(label: &'static str, value: String) -> StatRow {
    StatRow { label, value }
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::aggregate::{ApplicationRecord, PlacementStats};
    use crate::report::generator::{ActionStep, RoleSuggestion};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn input() -> ReportInput {
        ReportInput {
            user_id: Uuid::new_v4(),
            full_name: "Asha <Rao>".to_string(),
            role: "student".to_string(),
            college: Some("GEC".to_string()),
            company: None,
            designation: None,
            graduation_year: Some(2026),
            skills: vec![],
            applications: vec![ApplicationRecord {
                job_title: "SDE Intern".to_string(),
                company: "Acme & Sons".to_string(),
                status: "interview_scheduled".to_string(),
                rejection_reason: None,
                had_interview: true,
                applied_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            }],
            interviews: vec![],
            stats: PlacementStats {
                total_applications: 1,
                progressed: 1,
                interviews: 1,
                shortlist_rate: 1.0,
                ..PlacementStats::default()
            },
        }
    }

    fn report(score: f64) -> CareerReport {
        CareerReport {
            summary: "Strong start <b>".to_string(),
            career_score: score,
            strengths: vec!["Rust".to_string()],
            improvement_areas: vec![],
            recommended_roles: vec![RoleSuggestion {
                title: "Backend Engineer".to_string(),
                reason: "Systems focus".to_string(),
            }],
            action_plan: vec![ActionStep {
                step: "Mock interviews".to_string(),
                timeframe: Some("2 weeks".to_string()),
            }],
        }
    }

    #[test]
    fn test_render_escapes_and_includes_sections() {
        let generated = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let html = render_report_html(&input(), &report(75.0), generated).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Asha &lt;Rao&gt;"));
        assert!(html.contains("Strong start &lt;b&gt;"));
        assert!(html.contains("Acme &amp; Sons"));
        assert!(html.contains("interview scheduled"));
        assert!(html.contains("score high"));
        assert!(html.contains("Career score: 75/100"));
        assert!(html.contains("Shortlist rate</th><td>100%"));
        assert!(html.contains("<em>(2 weeks)</em>"));
        assert!(html.contains("01 Mar 2026"));
        assert!(!html.contains("Areas to improve"));
    }

    #[test]
    fn test_score_bands() {
        let generated = Utc::now();
        assert!(render_report_html(&input(), &report(55.0), generated).unwrap().contains("score mid"));
        assert!(render_report_html(&input(), &report(12.0), generated).unwrap().contains("score low"));
    }
}
