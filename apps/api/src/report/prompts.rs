/// Persona for the career report. Combined with `JSON_ONLY_SYSTEM` at call time.
pub const CAREER_REPORT_SYSTEM: &str =
    "You are an experienced campus placement advisor writing a personalised career report.";

/// Report prompt template. Replace `{grounding_instruction}` and `{records_json}`.
pub const CAREER_REPORT_PROMPT_TEMPLATE: &str = r#"Write a career report for the user described by the records below.

{grounding_instruction}

RECORDS:
{records_json}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "3-4 sentence overview of where the user stands",
  "career_score": 64,
  "strengths": ["..."],
  "improvement_areas": ["..."],
  "recommended_roles": [
    {"title": "Backend Engineer", "reason": "why this role fits the records"}
  ],
  "action_plan": [
    {"step": "concrete next action", "timeframe": "next 2 weeks"}
  ]
}

Rules:
- career_score is an integer from 0 to 100 reflecting placement readiness.
  Weigh skills breadth, application activity, shortlist and interview rates,
  and offers received.
- 3 to 5 strengths, 3 to 5 improvement areas, 2 to 4 recommended roles,
  3 to 6 action plan steps.
- If the user has no applications yet, focus the action plan on getting started.
"#;
