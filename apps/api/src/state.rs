use std::sync::Arc;

use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion provider used by every extraction. Swappable for tests.
    pub completion: Arc<dyn CompletionClient>,
    /// Upper bound for multipart uploads, in bytes.
    pub max_upload_bytes: usize,
}
