//! PDF extraction via `pdf-extract`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use super::Extractor;
use docquery_core::{Error, Result};

/// Best-effort linear text with page order preserved.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn content_types(&self) -> &[&'static str] {
        &["application/pdf"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["pdf"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let outcome = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

        match outcome {
            Ok(Ok(text)) => {
                debug!(bytes = bytes.len(), chars = text.len(), "Extracted PDF text");
                Ok(text)
            }
            Ok(Err(e)) => Err(Error::Parse(format!("Failed to parse PDF: {}", e))),
            Err(_) => Err(Error::Parse("Failed to parse PDF: malformed document".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_parse_error() {
        let err = PdfExtractor::new().extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_discriminants() {
        let pdf = PdfExtractor::new();
        assert_eq!(pdf.name(), "pdf");
        assert_eq!(pdf.content_types(), &["application/pdf"]);
        assert_eq!(pdf.extensions(), &["pdf"]);
    }
}
