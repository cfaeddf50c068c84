// Analysis pipeline: upload → transient file → extraction → (ATS score, critique).
// Nothing is stored; every request starts from the uploaded bytes.

pub mod handlers;
pub mod upload;

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::critique::{critique_resume, CritiqueOutcome};
use crate::errors::AppError;
use crate::extraction::{Extraction, Stage, StageFailure, TextExtractor};
use crate::scoring::{ats_report, AtsReport};
use crate::state::AppState;
use upload::{UploadForm, UploadedResume};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Found,
    NoText,
    Exhausted,
}

/// Extraction outcome without the document text itself.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub status: ExtractionStatus,
    pub method: Option<Stage>,
    pub characters: usize,
    pub failures: Vec<StageFailure>,
}

impl From<&Extraction> for ExtractionSummary {
    fn from(extraction: &Extraction) -> Self {
        let status = match extraction {
            Extraction::Found { .. } => ExtractionStatus::Found,
            Extraction::NoText => ExtractionStatus::NoText,
            Extraction::Exhausted { .. } => ExtractionStatus::Exhausted,
        };
        Self {
            status,
            method: extraction.method(),
            characters: extraction.text().chars().count(),
            failures: extraction.failures().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub extraction: ExtractionSummary,
    pub critique: CritiqueOutcome,
    pub ats: AtsReport,
}

/// Saves the upload to a temporary file and runs the blocking extractor on it.
/// The file is removed as soon as extraction finishes.
pub async fn extract_upload(
    extractor: Arc<TextExtractor>,
    resume: &UploadedResume,
) -> Result<Extraction, AppError> {
    info!(
        "Extracting text from '{}' ({} bytes)",
        resume.filename,
        resume.data.len()
    );

    let resume = resume.clone();
    tokio::task::spawn_blocking(move || -> Result<Extraction, AppError> {
        let file = resume.persist()?;
        Ok(extractor.extract(file.path()))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("extraction task failed: {e}")))?
}

/// Full analysis of one uploaded résumé.
pub async fn analyze(state: &AppState, form: UploadForm) -> Result<AnalysisReport, AppError> {
    let analysis_id = Uuid::new_v4();
    let extraction = extract_upload(state.extractor.clone(), &form.resume).await?;
    let resume_text = extraction.text();
    let job_description = form.job_description.as_deref();

    let ats = ats_report(resume_text, job_description.unwrap_or_default());
    let critique = critique_resume(state.llm.as_ref(), resume_text, job_description).await?;

    info!(
        "Analysis {analysis_id} complete: extraction={:?}, ats_score={}",
        extraction.method(),
        ats.score
    );

    Ok(AnalysisReport {
        analysis_id,
        analyzed_at: Utc::now(),
        extraction: ExtractionSummary::from(&extraction),
        critique,
        ats,
    })
}
