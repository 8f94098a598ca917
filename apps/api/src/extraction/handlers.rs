//! Axum route handlers for the extraction API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::{extract_text, DocumentFormat};
use crate::errors::AppError;
use crate::extraction::job_description::{summarise_job_description, JobDescriptionSummary};
use crate::extraction::resume::{analyse_resume, ResumeAnalysis};
use crate::state::AppState;

/// Multipart field names accepted for the uploaded document.
const UPLOAD_FIELDS: [&str; 2] = ["file", "resume"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobDescriptionRequest {
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTextResponse {
    pub file_name: Option<String>,
    pub format: DocumentFormat,
    pub text: String,
    /// Why extraction fell back to empty text, if it did.
    pub degraded: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUploadResponse {
    #[serde(flatten)]
    pub document: DocumentTextResponse,
    pub analysis: ResumeAnalysis,
}

struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze-job-description
///
/// Pre-fills the job posting form from a pasted job description.
pub async fn handle_analyze_job_description(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobDescriptionRequest>,
) -> Result<Json<JobDescriptionSummary>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }

    let summary =
        summarise_job_description(&request.job_description, state.completion.as_ref()).await?;
    Ok(Json(summary))
}

/// POST /api/v1/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resumeText cannot be empty".to_string()));
    }

    let analysis = analyse_resume(&request.resume_text, state.completion.as_ref()).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/documents/extract-text
///
/// Returns the plain text of an uploaded PDF or DOCX. Unreadable documents still
/// answer 200 with empty text and a `degraded` reason.
pub async fn handle_extract_text(
    multipart: Multipart,
) -> Result<Json<DocumentTextResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    Ok(Json(extract_upload(upload).await?))
}

/// POST /api/v1/analyze-resume/upload
///
/// Extracts text from an uploaded resume and analyzes it. A degraded extraction is
/// still analyzed (with whatever text there is) rather than rejected.
pub async fn handle_analyze_resume_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let document = extract_upload(upload).await?;

    let analysis = analyse_resume(&document.text, state.completion.as_ref()).await?;
    Ok(Json(ResumeUploadResponse { document, analysis }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if !field.name().is_some_and(|name| UPLOAD_FIELDS.contains(&name)) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Upload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' field".to_string(),
    ))
}

async fn extract_upload(upload: Upload) -> Result<DocumentTextResponse, AppError> {
    let format = DocumentFormat::detect(
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
        &upload.bytes,
    )
    .ok_or_else(|| {
        AppError::UnsupportedDocument("only PDF and DOCX documents are supported".to_string())
    })?;

    info!(
        "Extracting text from {} upload ({} bytes)",
        format.as_str(),
        upload.bytes.len()
    );

    let bytes = upload.bytes;
    let extracted = tokio::task::spawn_blocking(move || extract_text(&bytes, format))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let degraded = extracted.degraded_reason().map(str::to_string);
    Ok(DocumentTextResponse {
        file_name: upload.file_name,
        format,
        text: extracted.into_text(),
        degraded,
    })
}
