//! ATS score: share of the job description's vocabulary that also appears in the résumé.
//!
//! Algorithm:
//! 1. Lowercase both texts and collect distinct word tokens from each.
//! 2. score = |résumé ∩ jd| / |jd| × 100, rounded to two decimals (ties to even).
//! 3. Either input empty → 0.
//!
//! This is containment over the job description, not a symmetric similarity,
//! and stop-words count like any other token.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Word characters minus combining marks: "cafe\u{301}" yields "cafe".
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w&&\P{M}]+").expect("valid word pattern"));

/// Qualitative bucket for a score, as shown next to the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsBand {
    /// score > 80
    Excellent,
    /// 50 < score ≤ 80
    Fair,
    Poor,
}

impl AtsBand {
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            AtsBand::Excellent
        } else if score > 50.0 {
            AtsBand::Fair
        } else {
            AtsBand::Poor
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            AtsBand::Excellent => "Excellent ATS Optimization!",
            AtsBand::Fair => "Room for ATS Optimization",
            AtsBand::Poor => "Needs significant ATS optimization",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsReport {
    pub score: f64,
    pub job_description_provided: bool,
    pub band: Option<AtsBand>,
    pub headline: String,
    /// Job-description tokens found in the résumé, sorted.
    pub matched_keywords: Vec<String>,
    /// Job-description tokens absent from the résumé, sorted.
    pub missing_keywords: Vec<String>,
}

fn tokens(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn containment(matched: usize, vocabulary: usize) -> f64 {
    if vocabulary == 0 {
        return 0.0;
    }
    round2(matched as f64 / vocabulary as f64 * 100.0)
}

/// Keyword-overlap percentage in [0, 100].
pub fn score(resume_text: &str, job_description: &str) -> f64 {
    if resume_text.is_empty() || job_description.is_empty() {
        return 0.0;
    }
    let resume = tokens(resume_text);
    let jd = tokens(job_description);
    containment(jd.intersection(&resume).count(), jd.len())
}

/// `score` plus the band and keyword breakdown for display.
pub fn ats_report(resume_text: &str, job_description: &str) -> AtsReport {
    let job_description_provided = !job_description.trim().is_empty();
    let score = score(resume_text, job_description);

    let resume = tokens(resume_text);
    let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = tokens(job_description)
        .into_iter()
        .partition(|t| resume.contains(t));

    let band = job_description_provided.then(|| AtsBand::from_score(score));
    let headline = match band {
        Some(band) => band.headline().to_string(),
        None => "Please provide a job description to calculate ATS score".to_string(),
    };

    AtsReport {
        score,
        job_description_provided,
        band,
        headline,
        matched_keywords,
        missing_keywords,
    }
}
