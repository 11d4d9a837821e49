use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the evaluation that raised it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Error reading the PDF file: {0}")]
    PdfRead(String),

    #[error("Resume is not ATS-friendly")]
    FormatRejection { reasons: Vec<String> },

    #[error("Error communicating with the AI model: {0}")]
    ModelCall(String),

    #[error("Failed to parse the response: {0}")]
    ResponseParse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut reasons: Option<Vec<String>> = None;

        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                tracing::warn!("Rejected upload: {msg}");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::PayloadTooLarge { limit } => {
                tracing::warn!("{self}");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    format!(
                        "File size exceeds {:.1}MB. Please upload a smaller file.",
                        *limit as f64 / (1024.0 * 1024.0)
                    ),
                )
            }
            AppError::PdfRead(_) => {
                tracing::warn!("{self}");
                (StatusCode::BAD_REQUEST, "PDF_READ_ERROR", self.to_string())
            }
            AppError::FormatRejection { reasons: r } => {
                tracing::warn!("Format check rejected resume: {r:?}");
                reasons = Some(r.clone());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "FORMAT_REJECTED",
                    "Your resume is not ATS-friendly.".to_string(),
                )
            }
            AppError::ModelCall(msg) => {
                tracing::error!("Model call error: {msg}");
                (StatusCode::BAD_GATEWAY, "MODEL_CALL_ERROR", self.to_string())
            }
            AppError::ResponseParse(msg) => {
                tracing::error!("Response parse error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RESPONSE_PARSE_ERROR",
                    self.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(reasons) = reasons {
            error["reasons"] = json!(reasons);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
