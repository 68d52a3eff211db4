// Career report pipeline.
// aggregate user records → LLM (JSON) → HTML → object storage, with a Redis
// cache of the latest URL per user. All LLM calls go through llm_client.

pub mod aggregate;
pub mod cache;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod render;
