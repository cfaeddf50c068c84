//! Stage 1: embedded text layer via the `pdf-extract` crate.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::{ExtractionError, TextLayerReader};

/// Reads per-page text with `pdf_extract::extract_text_by_pages`.
///
/// pdf-extract panics on some malformed font tables; a panic is reported as
/// an ordinary parse error so the OCR stage still gets its turn.
pub struct PdfTextLayer;

impl TextLayerReader for PdfTextLayer {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_by_pages(path)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
            Err(payload) => Err(ExtractionError::Pdf(format!(
                "parser panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{Extraction, Stage, TextExtractor};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Write;

    /// Builds a one-page PDF whose content stream draws `line` in Courier.
    fn text_pdf(line: &str) -> tempfile::NamedTempFile {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&bytes).unwrap();
        file
    }

    #[test]
    fn test_reads_embedded_text_layer() {
        let pdf = text_pdf("Senior Rust Engineer");
        let pages = PdfTextLayer.read_pages(pdf.path()).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Rust"), "got {:?}", pages[0]);
    }

    #[test]
    fn test_text_layer_pdf_never_reaches_ocr() {
        // Unrunnable OCR binaries would surface as a failure if OCR were invoked.
        let ocr = crate::config::OcrConfig {
            pdftoppm_bin: "/nonexistent/pdftoppm".to_string(),
            tesseract_bin: "/nonexistent/tesseract".to_string(),
            ..Default::default()
        };
        let pdf = text_pdf("Python Java SQL");

        let result = TextExtractor::with_system_ocr(&ocr).extract(pdf.path());
        assert_eq!(result.method(), Some(Stage::TextLayer));
        assert!(result.text().contains("SQL"));
        assert!(result.failures().is_empty());
    }

    #[test]
    fn test_unreadable_pdf_without_ocr_tools_is_exhausted() {
        let ocr = crate::config::OcrConfig {
            pdftoppm_bin: "/nonexistent/pdftoppm".to_string(),
            ..Default::default()
        };
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 truncated").unwrap();

        let result = TextExtractor::with_system_ocr(&ocr).extract(file.path());
        assert_eq!(result.text(), "");
        assert!(matches!(result, Extraction::Exhausted { .. }));
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf").unwrap();

        let err = PdfTextLayer.read_pages(file.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[test]
    fn test_panic_payload_message_is_recovered() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("bad font");
        assert_eq!(panic_message(payload.as_ref()), "bad font");
    }
}
