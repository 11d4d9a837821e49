//! Axum route handlers for the Screening API.

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::screening::extractor::extract_resume_text;
use crate::screening::format_check::{check_resume_format, word_count, FormatCheckResult};
use crate::screening::pipeline::evaluate;
use crate::screening::report::{build_report, EvaluationReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// The fields pulled out of a multipart upload.
#[derive(Debug, Default)]
struct ResumeUpload {
    resume: Option<UploadedFile>,
    job_description: Option<String>,
}

#[derive(Debug)]
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

#[derive(Debug, Serialize)]
pub struct FormatCheckResponse {
    pub word_count: usize,
    #[serde(flatten)]
    pub check: FormatCheckResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluations
///
/// Multipart fields: `resume` (PDF file, required), `job_description` (text, optional).
/// Full pipeline: extract → format check → prompt → model → interpret → report.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EvaluationReport>, AppError> {
    let limit = state.config.max_upload_bytes;
    let upload = read_upload(multipart, limit).await?;
    let resume = require_pdf(upload.resume, limit)?;

    info!(
        "Evaluating resume ({} bytes, with_jd={})",
        resume.data.len(),
        upload.job_description.is_some()
    );

    let resume_text = extract_in_background(resume.data).await?;
    let result = evaluate(
        upload.job_description,
        resume_text,
        state.model.as_ref(),
        &state.cache,
    )
    .await?;

    Ok(Json(build_report(result)))
}

/// POST /api/v1/resumes/format-check
///
/// Runs extraction and the format heuristics only. Never calls the model.
pub async fn handle_format_check(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<FormatCheckResponse>, AppError> {
    let limit = state.config.max_upload_bytes;
    let upload = read_upload(multipart, limit).await?;
    let resume = require_pdf(upload.resume, limit)?;

    let text = extract_in_background(resume.data).await?;

    Ok(Json(FormatCheckResponse {
        word_count: word_count(&text),
        check: check_resume_format(&text),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<ResumeUpload, AppError> {
    let mut upload = ResumeUpload::default();
    let multipart_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { limit }
        } else {
            AppError::Validation(format!("Malformed upload: {}", e.body_text()))
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let data = field.bytes().await.map_err(multipart_error)?;
                upload.resume = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            "job_description" => {
                let text = field.text().await.map_err(multipart_error)?;
                upload.job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field '{other}'");
            }
        }
    }

    Ok(upload)
}

/// Enforces presence, the size limit and the PDF content type.
fn require_pdf(file: Option<UploadedFile>, limit: usize) -> Result<UploadedFile, AppError> {
    let file = file.ok_or_else(|| {
        AppError::Validation("Please upload your resume before submitting!".to_string())
    })?;

    if file.data.len() > limit {
        return Err(AppError::PayloadTooLarge { limit });
    }

    let is_pdf_type = file
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"));
    let has_pdf_name = file
        .file_name
        .as_deref()
        .is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"));
    if !is_pdf_type && !has_pdf_name {
        return Err(AppError::Validation(
            "Please upload your resume in PDF format.".to_string(),
        ));
    }

    Ok(file)
}

/// PDF parsing is CPU-bound; keep it off the async workers.
async fn extract_in_background(data: Bytes) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract_resume_text(&data))
        .await
        .context("PDF extraction task failed")?
}
