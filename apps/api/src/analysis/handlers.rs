//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::upload::parse_upload_form;
use crate::analysis::{analyze, extract_upload, AnalysisReport};
use crate::errors::AppError;
use crate::extraction::Extraction;
use crate::scoring::{ats_report, AtsReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AtsScoreRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// POST /api/v1/analyze
///
/// Multipart: `resume` (PDF), optional `job_description`.
/// Returns the critique and ATS report for the uploaded résumé.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = parse_upload_form(multipart).await?;
    let report = analyze(&state, form).await?;
    Ok(Json(report))
}

/// POST /api/v1/extract
///
/// Runs only the extraction pipeline and returns its tagged outcome,
/// including the extracted text.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Extraction>, AppError> {
    let form = parse_upload_form(multipart).await?;
    let extraction = extract_upload(state.extractor.clone(), &form.resume).await?;
    Ok(Json(extraction))
}

/// POST /api/v1/ats-score
pub async fn handle_ats_score(Json(request): Json<AtsScoreRequest>) -> Json<AtsReport> {
    let job_description = request.job_description.unwrap_or_default();
    Json(ats_report(&request.resume_text, &job_description))
}
