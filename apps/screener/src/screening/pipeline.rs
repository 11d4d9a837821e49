//! Evaluation pipeline: format check → prompt → cache / model → interpreter.
//!
//! All model calls go through the `ModelClient` trait; the cache sits in front
//! of it and is only consulted once the format check has passed.

use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::prompts::system_instruction;
use crate::llm_client::ModelClient;
use crate::screening::cache::ResponseCache;
use crate::screening::format_check::check_resume_format;
use crate::screening::interpreter::{interpret_response, EvaluationResult};
use crate::screening::prompts::build_prompt;

/// One user-initiated evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    job_description: Option<String>,
    resume_text: String,
}

impl EvaluationRequest {
    /// Blank job descriptions count as absent. Resume text must be non-empty.
    pub fn new(job_description: Option<String>, resume_text: String) -> Result<Self, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::Validation(
                "Resume text is empty; nothing to evaluate".to_string(),
            ));
        }
        let job_description = job_description.filter(|jd| !jd.trim().is_empty());
        Ok(Self {
            job_description,
            resume_text,
        })
    }

    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn has_job_description(&self) -> bool {
        self.job_description.is_some()
    }
}

/// Runs a full evaluation over already-extracted resume text.
///
/// A failing format check returns `FormatRejection` before any network call.
pub async fn evaluate(
    job_description: Option<String>,
    resume_text: String,
    model: &dyn ModelClient,
    cache: &ResponseCache,
) -> Result<EvaluationResult, AppError> {
    let format = check_resume_format(&resume_text);
    if !format.is_acceptable {
        return Err(AppError::FormatRejection {
            reasons: format.reasons,
        });
    }

    let request = EvaluationRequest::new(job_description, resume_text)?;
    let raw = fetch_model_response(&request, model, cache).await?;
    interpret_response(&raw, request.has_job_description())
}

async fn fetch_model_response(
    request: &EvaluationRequest,
    model: &dyn ModelClient,
    cache: &ResponseCache,
) -> Result<String, AppError> {
    if let Some(hit) = cache.get(request.job_description(), request.resume_text()) {
        debug!("Response cache hit; skipping model call");
        return Ok(hit);
    }

    let prompt = build_prompt(request.job_description(), request.resume_text());
    let system = system_instruction(request.has_job_description());

    info!(
        "Calling model (with_jd={}, prompt_chars={})",
        request.has_job_description(),
        prompt.len()
    );
    let raw = model
        .generate(&prompt, system)
        .await
        .map_err(|e| AppError::ModelCall(e.to_string()))?;

    cache.insert(
        request.job_description(),
        request.resume_text(),
        raw.clone(),
    );
    debug!("Response cache size: {}", cache.len());
    Ok(raw)
}
