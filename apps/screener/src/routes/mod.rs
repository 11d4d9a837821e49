pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

/// Multipart framing and the job description ride on top of the file itself.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + BODY_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/evaluations", post(handlers::handle_evaluate))
        .route(
            "/api/v1/resumes/format-check",
            post(handlers::handle_format_check),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
