//! Extraction pipeline — template → completion → tolerant JSON.
//!
//! Shared by every orchestrator. No retries and no caching: each call renders, sends
//! one completion request and parses whatever came back.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::json_repair::{extract_json, JsonExtractError};
use crate::extraction::template::{render, ExtractionTask};
use crate::llm_client::{CompletionClient, LlmError};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),

    #[error("could not extract JSON from completion: {0}")]
    Json(#[from] JsonExtractError),
}

/// Runs `task` over `input` and returns the parsed (not schema-validated) JSON value.
pub async fn run_extraction(
    task: &ExtractionTask,
    input: &str,
    client: &dyn CompletionClient,
) -> Result<Value, ExtractionError> {
    let prompt = render(task, &task.context_for(input));
    info!(
        "Running {} extraction ({} input chars)",
        task.kind.as_str(),
        input.chars().count()
    );
    debug!("Rendered prompt: {} bytes", prompt.len());

    let completion = client.complete(&prompt).await?;
    debug!("Completion received: {} bytes", completion.len());

    let extracted = match extract_json(&completion) {
        Ok(extracted) => extracted,
        Err(e) => {
            if let JsonExtractError::UnrecoverableJson { candidate } = &e {
                warn!(
                    "{} extraction returned unparsable JSON: {}",
                    task.kind.as_str(),
                    preview(candidate)
                );
            }
            return Err(e.into());
        }
    };

    if !extracted.repairs.is_empty() {
        warn!(
            "{} completion needed JSON repairs: {:?}",
            task.kind.as_str(),
            extracted.repairs
        );
    }

    let missing = task.missing_fields(&extracted.value);
    if !missing.is_empty() {
        warn!(
            "{} completion is missing fields: {}",
            task.kind.as_str(),
            missing.join(", ")
        );
    }
    let mismatched = task.mismatched_fields(&extracted.value);
    if !mismatched.is_empty() {
        debug!(
            "{} completion has unexpected field shapes: {}",
            task.kind.as_str(),
            mismatched.join(", ")
        );
    }

    Ok(extracted.value)
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{CompletionClient, LlmError};

    /// Completion client that returns a canned response and records prompts.
    pub struct StubClient {
        response: Result<String, u16>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        pub fn replying(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Fails every call with an API error carrying `status`.
        pub fn failing(status: u16) -> Self {
            Self {
                response: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "provider unavailable".to_string(),
                }),
            }
        }
    }
}
