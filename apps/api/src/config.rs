use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Serialize;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Decorative background shown behind the critique UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backdrop {
    #[default]
    Image,
    Video,
}

impl FromStr for Backdrop {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Backdrop::Image),
            "video" => Ok(Backdrop::Video),
            other => bail!("BACKDROP must be 'image' or 'video', got '{other}'"),
        }
    }
}

/// OCR fallback settings: external binaries and rendering parameters.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub dpi: u32,
    pub language: String,
    pub pdftoppm_bin: String,
    pub tesseract_bin: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            language: "eng".to_string(),
            pdftoppm_bin: "pdftoppm".to_string(),
            tesseract_bin: "tesseract".to_string(),
        }
    }
}

/// Application configuration loaded once from environment variables at startup.
///
/// The Gemini API key is optional here: a missing key is reported when a
/// critique is requested, not at boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub llm_timeout_secs: Option<u64>,
    pub port: u16,
    pub rust_log: String,
    pub ocr: OcrConfig,
    pub max_upload_bytes: usize,
    pub backdrop: Backdrop,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ocr_defaults = OcrConfig::default();

        Ok(Config {
            google_api_key: optional_env("GOOGLE_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ocr: OcrConfig {
                dpi: parse_env("OCR_DPI", ocr_defaults.dpi)
                    .context("OCR_DPI must be a positive integer")?,
                language: optional_env("OCR_LANGUAGE").unwrap_or(ocr_defaults.language),
                pdftoppm_bin: optional_env("PDFTOPPM_BIN").unwrap_or(ocr_defaults.pdftoppm_bin),
                tesseract_bin: optional_env("TESSERACT_BIN")
                    .unwrap_or(ocr_defaults.tesseract_bin),
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            backdrop: optional_env("BACKDROP")
                .map(|v| v.parse::<Backdrop>())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Reads an env var, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_parses_case_insensitively() {
        assert_eq!("VIDEO".parse::<Backdrop>().unwrap(), Backdrop::Video);
        assert_eq!(" image ".parse::<Backdrop>().unwrap(), Backdrop::Image);
    }

    #[test]
    fn test_backdrop_rejects_unknown_value() {
        assert!("starfield".parse::<Backdrop>().is_err());
    }

    #[test]
    fn test_ocr_defaults_match_tesseract_english() {
        let ocr = OcrConfig::default();
        assert_eq!(ocr.language, "eng");
        assert_eq!(ocr.dpi, 200);
    }
}
