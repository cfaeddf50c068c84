pub mod health;
pub mod presentation;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/presentation",
            get(presentation::presentation_handler),
        )
        // Analysis API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/ats-score", post(handlers::handle_ats_score))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
