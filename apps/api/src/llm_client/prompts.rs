// Cross-cutting prompt fragments. Each feature that calls the model keeps its
// own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated advice tied to the records we actually sent.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the profile and placement records provided. \
    Do NOT invent employers, offers, interview outcomes, grades or skills. \
    If the records are thin, say so and give advice for building them up.";
