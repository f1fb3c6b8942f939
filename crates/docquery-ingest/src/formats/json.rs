//! JSON extraction: parse and pretty-print with 2-space indentation.

use super::{decode_lossy, Extractor};
use docquery_core::{Error, Result};

/// Claimed by the `.json` extension only; a declared `application/json` type
/// alone does not route here.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExtractor;

impl JsonExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for JsonExtractor {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let decoded = decode_lossy(bytes);
        let value: serde_json::Value = serde_json::from_str(&decoded)
            .map_err(|e| Error::Parse(format!("Invalid JSON: {}", e)))?;
        serde_json::to_string_pretty(&value).map_err(Error::Json)
    }
}
