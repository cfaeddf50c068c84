//! Résumé critique: builds the fixed-structure prompt and hands it to the
//! configured `TextGenerator`. The model's prose is returned verbatim.

pub mod prompts;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use prompts::{CRITIQUE_PROMPT_TEMPLATE, JOB_MATCH_SECTION_TEMPLATE};

pub const MISSING_RESUME_MESSAGE: &str = "Resume text is required for analysis.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CritiqueOutcome {
    Completed { text: String, model: String },
    /// The service was not called because there was nothing to critique.
    Rejected { message: String },
}

/// Builds the critique prompt; the job-match section is added only when a
/// non-blank job description is given.
pub fn build_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = CRITIQUE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    if let Some(jd) = job_description.filter(|jd| !jd.trim().is_empty()) {
        prompt.push_str(&JOB_MATCH_SECTION_TEMPLATE.replace("{job_description}", jd));
    }
    prompt
}

/// Requests a critique of `resume_text`.
///
/// Empty résumé text short-circuits to `Rejected`. Any generator failure is
/// mapped to `AppError::Llm`, which the client only ever sees as a generic
/// failure message.
pub async fn critique_resume(
    generator: &dyn TextGenerator,
    resume_text: &str,
    job_description: Option<&str>,
) -> Result<CritiqueOutcome, AppError> {
    if resume_text.trim().is_empty() {
        return Ok(CritiqueOutcome::Rejected {
            message: MISSING_RESUME_MESSAGE.to_string(),
        });
    }

    let prompt = build_prompt(resume_text, job_description);
    let text = generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Resume critique failed: {e}")))?;

    info!(
        "Critique generated by {} ({} chars)",
        generator.model(),
        text.len()
    );

    Ok(CritiqueOutcome::Completed {
        text: text.trim().to_string(),
        model: generator.model().to_string(),
    })
}
