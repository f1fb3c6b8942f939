//! Extractor registry: routes an upload to the extractor that claims it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::formats::{
    CsvExtractor, DocxExtractor, Extractor, JsonExtractor, PdfExtractor, TextExtractor,
};
use docquery_core::{Error, Result};

/// Text produced by a registered extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Name of the extractor that ran.
    pub format: &'static str,
    pub text: String,
}

/// Registry of format extractors keyed by content type and extension.
///
/// Resolution order: exact content type, then content-type prefix, then file
/// extension. Within one rule the first registered extractor wins.
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
    /// Exact content type → extractor slot
    content_types: HashMap<String, usize>,
    /// Content-type prefixes in registration order
    prefixes: Vec<(String, usize)>,
    /// Lower-cased extension → extractor slot
    extensions: HashMap<String, usize>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            content_types: HashMap::new(),
            prefixes: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// Registry with PDF, DOCX, plain text, CSV and JSON support.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfExtractor::new());
        registry.register(DocxExtractor::new());
        registry.register(TextExtractor::new());
        registry.register(CsvExtractor::new());
        registry.register(JsonExtractor::new());
        registry
    }

    /// Register an extractor under every discriminant it claims.
    pub fn register<E: Extractor + 'static>(&mut self, extractor: E) {
        let slot = self.extractors.len();

        for ct in extractor.content_types() {
            self.content_types
                .entry(ct.to_ascii_lowercase())
                .or_insert(slot);
        }
        for prefix in extractor.content_type_prefixes() {
            self.prefixes.push((prefix.to_ascii_lowercase(), slot));
        }
        for ext in extractor.extensions() {
            self.extensions
                .entry(ext.trim_start_matches('.').to_ascii_lowercase())
                .or_insert(slot);
        }

        debug!(format = extractor.name(), slot, "Registered extractor");
        self.extractors.push(Arc::new(extractor));
    }

    /// Names of the registered formats, in registration order.
    pub fn formats(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Find the extractor for a declared content type and filename.
    pub fn resolve(&self, content_type: &str, filename: &str) -> Option<Arc<dyn Extractor>> {
        let mime = normalize_content_type(content_type);

        let slot = self
            .content_types
            .get(&mime)
            .copied()
            .or_else(|| {
                self.prefixes
                    .iter()
                    .find(|(prefix, _)| !mime.is_empty() && mime.starts_with(prefix.as_str()))
                    .map(|(_, slot)| *slot)
            })
            .or_else(|| {
                file_extension(filename).and_then(|ext| self.extensions.get(&ext).copied())
            })?;

        self.extractors.get(slot).cloned()
    }

    /// Resolve and run the matching extractor.
    ///
    /// Fails with `UnsupportedFormat` carrying the declared content type when
    /// no rule matches.
    pub fn extract(&self, content_type: &str, filename: &str, bytes: &[u8]) -> Result<Extraction> {
        let extractor = self
            .resolve(content_type, filename)
            .ok_or_else(|| Error::UnsupportedFormat(content_type.to_string()))?;

        debug!(
            format = extractor.name(),
            content_type,
            filename,
            bytes = bytes.len(),
            "Dispatching extraction"
        );

        let text = extractor.extract(bytes)?;
        Ok(Extraction {
            format: extractor.name(),
            text,
        })
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Lower-case the media type and drop parameters such as `; charset=utf-8`.
fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    fn resolved(registry: &ExtractorRegistry, ct: &str, name: &str) -> Option<&'static str> {
        registry.resolve(ct, name).map(|e| e.name())
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ExtractorRegistry::new();
        assert!(registry.formats().is_empty());
        assert!(registry.resolve("text/plain", "a.txt").is_none());
    }

    #[test]
    fn test_defaults_registered() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.formats(), vec!["pdf", "docx", "text", "csv", "json"]);
    }

    #[test]
    fn test_exact_content_types() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(resolved(&registry, "application/pdf", "x"), Some("pdf"));
        assert_eq!(resolved(&registry, DOCX_MIME, "x"), Some("docx"));
        assert_eq!(resolved(&registry, "text/csv", "x"), Some("csv"));
    }

    #[test]
    fn test_json_resolved_by_extension_only() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(resolved(&registry, "application/json", "data.json"), Some("json"));
        assert_eq!(resolved(&registry, "application/json", "notes.txt"), Some("text"));
        assert_eq!(resolved(&registry, "application/json", "blob"), None);

        let extraction = registry
            .extract("application/json", "notes.txt", b"plain notes, not json")
            .unwrap();
        assert_eq!(extraction.format, "text");
        assert_eq!(extraction.text, "plain notes, not json");
    }

    #[test]
    fn test_content_type_beats_extension() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(resolved(&registry, "application/pdf", "notes.csv"), Some("pdf"));
        // Generic text wins over a specific extension.
        assert_eq!(resolved(&registry, "text/plain", "data.csv"), Some("text"));
    }

    #[test]
    fn test_extension_fallback_for_generic_types() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(resolved(&registry, "application/octet-stream", "data.csv"), Some("csv"));
        assert_eq!(resolved(&registry, "", "config.JSON"), Some("json"));
        assert_eq!(resolved(&registry, "", "notes.txt"), Some("text"));
        assert_eq!(resolved(&registry, "", "report.docx"), Some("docx"));
    }

    #[test]
    fn test_content_type_parameters_and_case_ignored() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(resolved(&registry, "Text/Markdown; charset=utf-8", "README"), Some("text"));
        assert_eq!(resolved(&registry, "APPLICATION/PDF", "x"), Some("pdf"));
    }

    #[test]
    fn test_unsupported_carries_declared_type() {
        let registry = ExtractorRegistry::with_defaults();
        let err = registry.extract("image/png", "photo.png", b"\x89PNG").unwrap_err();
        match err {
            Error::UnsupportedFormat(ct) => assert_eq!(ct, "image/png"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extract_reports_format() {
        let registry = ExtractorRegistry::with_defaults();
        let extraction = registry.extract("", "rows.csv", b"a,b\nc,d").unwrap();
        assert_eq!(extraction.format, "csv");
        assert_eq!(extraction.text, "a | b\nc | d");
    }

    struct UpperExtractor;

    impl Extractor for UpperExtractor {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn extensions(&self) -> &[&'static str] {
            &[".shout"]
        }

        fn extract(&self, bytes: &[u8]) -> Result<String> {
            Ok(crate::formats::decode_lossy(bytes).to_uppercase())
        }
    }

    #[test]
    fn test_custom_extractor_pluggable() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(UpperExtractor);
        let extraction = registry.extract("", "note.shout", b"hi there").unwrap();
        assert_eq!(extraction.format, "upper");
        assert_eq!(extraction.text, "HI THERE");
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = ExtractorRegistry::new();
        registry.register(TextExtractor::new());
        registry.register(UpperExtractor);
        registry.register(CsvExtractor::new());
        // CSV claims text/csv exactly, which beats the text/ prefix.
        assert_eq!(resolved(&registry, "text/csv", "x"), Some("csv"));
        assert_eq!(resolved(&registry, "text/html", "x"), Some("text"));
    }
}
