//! Plain text extraction.

use super::{decode_lossy, Extractor};
use docquery_core::Result;

/// Passes text through after lossy UTF-8 decoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for TextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn content_type_prefixes(&self) -> &[&'static str] {
        &["text/"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(decode_lossy(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_returned_as_is() {
        let text = TextExtractor::new().extract(b"line one\nline two\n").unwrap();
        assert_eq!(text, "line one\nline two\n");
    }

    #[test]
    fn test_invalid_bytes_never_fail() {
        let text = TextExtractor::new().extract(b"caf\xe9 ok").unwrap();
        assert_eq!(text, "caf ok");
    }

    #[test]
    fn test_same_bytes_same_text() {
        let bytes = b"r\xe9sum\xc3\xa9\r\nline";
        let extractor = TextExtractor::new();
        assert_eq!(extractor.extract(bytes).unwrap(), extractor.extract(bytes).unwrap());
    }
}
