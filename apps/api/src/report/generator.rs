//! Career report generation.
//!
//! Flow: load_report_input → LLM (JSON) → normalize → render HTML →
//!       upload to S3 → INSERT career_reports → cache URL.

use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::report::CareerReportRow;
use crate::report::aggregate::{load_report_input, ReportInput};
use crate::report::cache;
use crate::report::prompts::{CAREER_REPORT_PROMPT_TEMPLATE, CAREER_REPORT_SYSTEM};
use crate::report::render::render_report_html;
use crate::state::AppState;

const MAX_LIST_ITEMS: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleSuggestion {
    pub title: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionStep {
    pub step: String,
    #[serde(default)]
    pub timeframe: Option<String>,
}

/// The model's report, after `normalize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerReport {
    pub summary: String,
    /// Models sometimes emit fractional scores; rounded in `normalize`.
    pub career_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub recommended_roles: Vec<RoleSuggestion>,
    #[serde(default)]
    pub action_plan: Vec<ActionStep>,
}

impl CareerReport {
    /// Clamps the score to 0–100, trims text and drops blank or excess items.
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.summary = self.summary.trim().to_string();
        if self.summary.is_empty() {
            return Err(AppError::Llm("career report has an empty summary".to_string()));
        }
        if !self.career_score.is_finite() {
            return Err(AppError::Llm("career report score is not a number".to_string()));
        }
        self.career_score = self.career_score.round().clamp(0.0, 100.0);

        self.strengths = clean_list(self.strengths);
        self.improvement_areas = clean_list(self.improvement_areas);
        self.recommended_roles.retain(|r| !r.title.trim().is_empty());
        self.recommended_roles.truncate(MAX_LIST_ITEMS);
        self.action_plan.retain(|a| !a.step.trim().is_empty());
        self.action_plan.truncate(MAX_LIST_ITEMS);
        Ok(self)
    }

    pub fn score(&self) -> i32 {
        self.career_score as i32
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_LIST_ITEMS)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateReportRequest {
    /// Skip the cached report and generate a fresh one.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReportResponse {
    pub url: String,
    pub cached: bool,
    pub report: Option<CareerReportRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_career_report(
    state: &AppState,
    user_id: Uuid,
    request: GenerateReportRequest,
) -> Result<GenerateReportResponse, AppError> {
    if !request.force {
        if let Some(url) = cache::get_latest_url(&state.redis, user_id).await {
            info!("Serving cached career report for user {user_id}");
            return Ok(GenerateReportResponse {
                url,
                cached: true,
                report: None,
            });
        }
    }

    // Step 1: gather records
    let input = load_report_input(&state.db, user_id).await?;
    info!(
        "Generating career report for user {user_id}: {} applications, {} interviews",
        input.stats.total_applications, input.stats.interviews
    );

    // Step 2: LLM
    let report = request_report(&state.llm, &input).await?;

    // Step 3: render
    let report_id = Uuid::new_v4();
    let generated_at = Utc::now();
    let html = render_report_html(&input, &report, generated_at)?;

    // Step 4: upload
    let s3_key = format!("career-reports/{user_id}/{report_id}.html");
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(html.into_bytes()))
        .content_type("text/html; charset=utf-8")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("career report upload failed: {e}")))?;
    let public_url = state.config.public_object_url(&s3_key);
    info!("Uploaded career report to s3://{}/{}", state.config.s3_bucket, s3_key);

    // Step 5: record
    let row = sqlx::query_as::<_, CareerReportRow>(
        r#"
        INSERT INTO career_reports (id, user_id, s3_key, public_url, career_score, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(user_id)
    .bind(&s3_key)
    .bind(&public_url)
    .bind(report.score())
    .bind(generated_at)
    .fetch_one(&state.db)
    .await?;

    cache::set_latest_url(
        &state.redis,
        user_id,
        &public_url,
        state.config.report_cache_ttl_secs,
    )
    .await;

    Ok(GenerateReportResponse {
        url: public_url,
        cached: false,
        report: Some(row),
    })
}

async fn request_report(llm: &LlmClient, input: &ReportInput) -> Result<CareerReport, AppError> {
    let prompt = build_report_prompt(input)?;
    let system = format!("{CAREER_REPORT_SYSTEM} {JSON_ONLY_SYSTEM}");
    let report: CareerReport = llm
        .call_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Career report LLM call failed: {e}")))?;

    let report = report.normalize()?;
    if report.strengths.is_empty() || report.action_plan.is_empty() {
        warn!(
            "Career report for {} came back sparse: {} strengths, {} action steps",
            input.user_id,
            report.strengths.len(),
            report.action_plan.len()
        );
    }
    Ok(report)
}

/// Fills the prompt template with the serialized records.
pub fn build_report_prompt(input: &ReportInput) -> Result<String, AppError> {
    let records_json = serde_json::to_string_pretty(input)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report input: {e}")))?;

    Ok(CAREER_REPORT_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{records_json}", &records_json))
}

pub async fn list_reports(state: &AppState, user_id: Uuid) -> Result<Vec<CareerReportRow>, AppError> {
    Ok(sqlx::query_as::<_, CareerReportRow>(
        "SELECT * FROM career_reports WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::aggregate::PlacementStats;

    fn input() -> ReportInput {
        ReportInput {
            user_id: Uuid::new_v4(),
            full_name: "Asha Rao".to_string(),
            role: "student".to_string(),
            college: Some("Govt. Engineering College".to_string()),
            company: None,
            designation: None,
            graduation_year: Some(2026),
            skills: vec!["rust".to_string(), "sql".to_string()],
            applications: vec![],
            interviews: vec![],
            stats: PlacementStats::default(),
        }
    }

    #[test]
    fn test_report_parses_model_json() {
        let json = serde_json::json!({
            "summary": "Solid foundations.",
            "career_score": 71.6,
            "strengths": ["Rust", " ", "SQL"],
            "improvement_areas": ["Apply more widely"],
            "recommended_roles": [{"title": "Backend Engineer", "reason": "Rust + SQL"}],
            "action_plan": [{"step": "Apply to 5 roles"}]
        });
        let report: CareerReport = serde_json::from_value(json).unwrap();
        let report = report.normalize().unwrap();
        assert_eq!(report.score(), 72);
        assert_eq!(report.strengths, vec!["Rust", "SQL"]);
        assert_eq!(report.action_plan[0].timeframe, None);
    }

    #[test]
    fn test_score_is_clamped() {
        let report = CareerReport {
            summary: "x".to_string(),
            career_score: 140.0,
            strengths: vec![],
            improvement_areas: vec![],
            recommended_roles: vec![],
            action_plan: vec![],
        };
        assert_eq!(report.normalize().unwrap().score(), 100);
    }

    #[test]
    fn test_empty_summary_is_an_llm_error() {
        let report = CareerReport {
            summary: "   ".to_string(),
            career_score: 50.0,
            strengths: vec![],
            improvement_areas: vec![],
            recommended_roles: vec![],
            action_plan: vec![],
        };
        assert!(matches!(report.normalize(), Err(AppError::Llm(_))));
    }

    #[test]
    fn test_lists_are_capped() {
        let report = CareerReport {
            summary: "ok".to_string(),
            career_score: 10.0,
            strengths: (0..20).map(|i| format!("s{i}")).collect(),
            improvement_areas: vec![],
            recommended_roles: vec![],
            action_plan: vec![],
        };
        assert_eq!(report.normalize().unwrap().strengths.len(), MAX_LIST_ITEMS);
    }

    #[test]
    fn test_prompt_embeds_records() {
        let prompt = build_report_prompt(&input()).unwrap();
        assert!(prompt.contains("Asha Rao"));
        assert!(prompt.contains("Govt. Engineering College"));
        assert!(prompt.contains(GROUNDING_INSTRUCTION));
        assert!(!prompt.contains("{records_json}"));
    }

    #[test]
    fn test_force_defaults_false() {
        let req: GenerateReportRequest = serde_json::from_str("{}").unwrap();
        assert!(!req.force);
    }
}
