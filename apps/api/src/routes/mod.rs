pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction API
        .route(
            "/api/v1/analyze-job-description",
            post(handlers::handle_analyze_job_description),
        )
        .route(
            "/api/v1/analyze-resume",
            post(handlers::handle_analyze_resume),
        )
        .route(
            "/api/v1/analyze-resume/upload",
            post(handlers::handle_analyze_resume_upload).layer(upload_limit.clone()),
        )
        .route(
            "/api/v1/documents/extract-text",
            post(handlers::handle_extract_text).layer(upload_limit),
        )
        .with_state(state)
}
