use axum::extract::Multipart;
use bytes::Bytes;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// A résumé PDF received in a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub filename: String,
    pub data: Bytes,
}

impl UploadedResume {
    /// Writes the upload to a temporary file that is deleted on drop.
    pub fn persist(&self) -> Result<NamedTempFile, AppError> {
        let mut file = tempfile::Builder::new()
            .prefix("uploaded_resume_")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| AppError::Internal(e.into()))?;
        file.write_all(&self.data)
            .map_err(|e| AppError::Internal(e.into()))?;
        file.flush().map_err(|e| AppError::Internal(e.into()))?;
        Ok(file)
    }
}

/// Parsed form fields from the multipart upload.
#[derive(Debug)]
pub struct UploadForm {
    pub resume: UploadedResume,
    /// `None` when the field is missing or blank.
    pub job_description: Option<String>,
}

/// Parses `resume` (PDF file) and optional `job_description` (text) fields.
/// Unknown fields are drained and ignored.
pub async fn parse_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut resume: Option<UploadedResume> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let data = field.bytes().await?;
                ensure_pdf(&filename, &data)?;
                resume = Some(UploadedResume { filename, data });
            }
            "job_description" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    job_description = Some(text);
                }
            }
            _ => {
                let _ = field.bytes().await?;
            }
        }
    }

    let resume = resume.ok_or_else(|| {
        AppError::Validation("Please upload a resume in PDF format.".to_string())
    })?;

    Ok(UploadForm {
        resume,
        job_description,
    })
}

/// Accepts a `.pdf` filename or `%PDF` magic bytes; rejects empty uploads.
fn ensure_pdf(filename: &str, data: &[u8]) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded resume is empty".to_string()));
    }
    if filename.to_lowercase().ends_with(".pdf") || data.starts_with(PDF_MAGIC) {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Unsupported file '{filename}': resume must be a PDF"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_accepted() {
        assert!(ensure_pdf("CV.PDF", b"anything").is_ok());
    }

    #[test]
    fn test_pdf_magic_accepted_without_extension() {
        assert!(ensure_pdf("upload", b"%PDF-1.7\n...").is_ok());
    }

    #[test]
    fn test_non_pdf_rejected() {
        let err = ensure_pdf("resume.docx", b"PK\x03\x04").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(
            ensure_pdf("resume.pdf", b""),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_persisted_copy_is_removed_on_drop() {
        let upload = UploadedResume {
            filename: "resume.pdf".to_string(),
            data: Bytes::from_static(b"%PDF-1.4"),
        };
        let file = upload.persist().unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");

        drop(file);
        assert!(!path.exists());
    }
}
