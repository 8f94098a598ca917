// Structured extraction: prompt templates, completion, tolerant JSON parsing,
// and the per-task orchestrators built on top of them.
// All completion calls go through the llm_client::CompletionClient trait.

pub mod fields;
pub mod handlers;
pub mod job_description;
pub mod json_repair;
pub mod pipeline;
pub mod prompts;
pub mod resume;
pub mod template;
