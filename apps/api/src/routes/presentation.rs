use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::Backdrop;
use crate::state::AppState;

pub const TITLE: &str = "AI Resume Critique Bot";
pub const TAGLINE: &str =
    "Get detailed professional feedback on your resume from our AI-powered critique bot";

#[derive(Debug, Serialize)]
pub struct PresentationResponse {
    pub title: &'static str,
    pub tagline: &'static str,
    pub backdrop: Backdrop,
    pub model: String,
}

/// GET /api/v1/presentation
/// Display options for the front end. The background-video variant is a
/// `backdrop` value, not a separate code path.
pub async fn presentation_handler(State(state): State<AppState>) -> Json<PresentationResponse> {
    Json(PresentationResponse {
        title: TITLE,
        tagline: TAGLINE,
        backdrop: state.config.backdrop,
        model: state.llm.model().to_string(),
    })
}
