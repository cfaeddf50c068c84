//! Résumé text extraction: a two-stage pipeline over an uploaded PDF.
//!
//! Stage 1 reads the embedded text layer page by page. Stage 2 (OCR) only runs
//! when stage 1 fails or yields whitespace. Stage errors never abort the call;
//! they are logged and carried on the returned `Extraction` so callers can tell
//! "no text in this document" apart from "the extractor broke".
//!
//! Both stages are synchronous. Async callers must go through
//! `tokio::task::spawn_blocking`.

pub mod ocr;
pub mod text_layer;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::OcrConfig;

pub use ocr::PopplerTesseract;
pub use text_layer::PdfTextLayer;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("Page rendering failed: {0}")]
    Render(String),

    #[error("OCR failed on page {page}: {message}")]
    Ocr { page: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which stage of the pipeline produced (or failed to produce) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TextLayer,
    Ocr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

/// Outcome of running the extraction pipeline on one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Extraction {
    /// Non-empty, trimmed text. `failures` lists stage errors recovered from.
    Found {
        text: String,
        method: Stage,
        failures: Vec<StageFailure>,
    },
    /// Both stages completed cleanly and the document holds no text.
    NoText,
    /// At least one stage failed and nothing was recovered.
    Exhausted { failures: Vec<StageFailure> },
}

impl Extraction {
    /// The extracted document text; empty unless something was found.
    pub fn text(&self) -> &str {
        match self {
            Extraction::Found { text, .. } => text,
            Extraction::NoText | Extraction::Exhausted { .. } => "",
        }
    }

    pub fn method(&self) -> Option<Stage> {
        match self {
            Extraction::Found { method, .. } => Some(*method),
            _ => None,
        }
    }

    pub fn failures(&self) -> &[StageFailure] {
        match self {
            Extraction::Found { failures, .. } | Extraction::Exhausted { failures } => failures,
            Extraction::NoText => &[],
        }
    }

    fn from_parts(text: String, method: Stage, failures: Vec<StageFailure>) -> Self {
        let text = text.trim();
        if !text.is_empty() {
            Extraction::Found {
                text: text.to_string(),
                method,
                failures,
            }
        } else if failures.is_empty() {
            Extraction::NoText
        } else {
            Extraction::Exhausted { failures }
        }
    }
}

/// Reads the embedded text layer of a PDF, one entry per page in page order.
pub trait TextLayerReader: Send + Sync {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// Rasterizes PDF pages and recognizes text on the rendered images.
pub trait PageOcr: Send + Sync {
    /// Renders every page of `pdf` into `out_dir`, returning image paths in page order.
    fn render_pages(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ExtractionError>;

    /// Runs recognition on a single page image. `page` is 1-based.
    fn recognize(&self, image: &Path, page: usize) -> Result<String, ExtractionError>;
}

/// The text-layer → OCR fallback chain.
pub struct TextExtractor {
    text_layer: Box<dyn TextLayerReader>,
    ocr: Box<dyn PageOcr>,
}

impl TextExtractor {
    pub fn new(text_layer: Box<dyn TextLayerReader>, ocr: Box<dyn PageOcr>) -> Self {
        Self { text_layer, ocr }
    }

    /// pdf-extract for the text layer, poppler + tesseract for OCR.
    pub fn with_system_ocr(ocr: &OcrConfig) -> Self {
        Self::new(
            Box::new(PdfTextLayer),
            Box::new(PopplerTesseract::new(ocr.clone())),
        )
    }

    pub fn extract(&self, path: &Path) -> Extraction {
        let mut failures = Vec::new();

        match self.text_layer.read_pages(path) {
            Ok(pages) => {
                let text: String = pages
                    .iter()
                    .filter(|p| !p.is_empty())
                    .map(String::as_str)
                    .collect();
                if !text.trim().is_empty() {
                    return Extraction::from_parts(text, Stage::TextLayer, failures);
                }
            }
            Err(e) => {
                warn!("Direct text extraction failed: {e}");
                failures.push(StageFailure {
                    stage: Stage::TextLayer,
                    message: e.to_string(),
                });
            }
        }

        info!("Falling back to OCR for image-based PDF");
        let text = self.run_ocr(path, &mut failures);
        Extraction::from_parts(text, Stage::Ocr, failures)
    }

    /// Returns whatever text was accumulated before the first OCR error.
    fn run_ocr(&self, path: &Path, failures: &mut Vec<StageFailure>) -> String {
        let mut text = String::new();
        if let Err(e) = self.ocr_pages(path, &mut text) {
            warn!("OCR failed: {e}");
            failures.push(StageFailure {
                stage: Stage::Ocr,
                message: e.to_string(),
            });
        }
        text
    }

    fn ocr_pages(&self, path: &Path, text: &mut String) -> Result<(), ExtractionError> {
        // Rendered pages live only as long as this directory.
        let scratch = tempfile::tempdir()?;
        let images = self.ocr.render_pages(path, scratch.path())?;
        info!("Rendered {} pages, starting OCR", images.len());

        for (i, image) in images.iter().enumerate() {
            let page_text = self.ocr.recognize(image, i + 1)?;
            text.push_str(&page_text);
            text.push('\n');
        }
        Ok(())
    }
}
