//! Stage 2: OCR over rendered pages using poppler's `pdftoppm` and `tesseract`.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{ExtractionError, PageOcr};
use crate::config::OcrConfig;

/// Shells out to `pdftoppm` for rasterization and `tesseract` for recognition.
pub struct PopplerTesseract {
    config: OcrConfig,
}

impl PopplerTesseract {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

impl PageOcr for PopplerTesseract {
    fn render_pages(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
        let output = Command::new(&self.config.pdftoppm_bin)
            .arg("-png")
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg(pdf)
            .arg(out_dir.join("page"))
            .output()
            .map_err(|e| {
                ExtractionError::Render(format!(
                    "failed to run {}: {e}",
                    self.config.pdftoppm_bin
                ))
            })?;

        if !output.status.success() {
            return Err(ExtractionError::Render(format!(
                "{} exited with {}: {}",
                self.config.pdftoppm_bin,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let images = collect_page_images(out_dir)?;
        if images.is_empty() {
            return Err(ExtractionError::Render(
                "pdftoppm produced no images".to_string(),
            ));
        }
        Ok(images)
    }

    fn recognize(&self, image: &Path, page: usize) -> Result<String, ExtractionError> {
        let output = Command::new(&self.config.tesseract_bin)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .output()
            .map_err(|e| ExtractionError::Ocr {
                page,
                message: format!("failed to run {}: {e}", self.config.tesseract_bin),
            })?;

        if !output.status.success() {
            return Err(ExtractionError::Ocr {
                page,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR page {page}: {} chars", text.len());
        Ok(text)
    }
}

/// Lists the PNGs pdftoppm wrote, in page order.
///
/// pdftoppm zero-pads page numbers to the width of the page count
/// (`page-01.png` .. `page-12.png`), so a lexical sort is page order.
fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    images.sort();
    Ok(images)
}
