//! Format extractors: raw upload bytes → plain text.
//!
//! Every extractor is a pure function of its input bytes. Text-based formats
//! decode with [`decode_lossy`], which drops invalid UTF-8 instead of failing.

pub mod csv;
pub mod docx;
pub mod json;
pub mod pdf;
pub mod text;

pub use self::csv::CsvExtractor;
pub use self::docx::DocxExtractor;
pub use self::json::JsonExtractor;
pub use self::pdf::PdfExtractor;
pub use self::text::TextExtractor;

use docquery_core::Result;

/// A text extractor for one document format.
///
/// The discriminant methods tell the registry which uploads the extractor
/// claims; all are matched case-insensitively.
pub trait Extractor: Send + Sync {
    /// Short format name (`pdf`, `csv`, ...).
    fn name(&self) -> &'static str;

    /// Content types handled exactly (e.g. `application/pdf`).
    fn content_types(&self) -> &[&'static str] {
        &[]
    }

    /// Content-type prefixes handled (e.g. `text/`).
    fn content_type_prefixes(&self) -> &[&'static str] {
        &[]
    }

    /// File extensions handled, without the dot.
    fn extensions(&self) -> &[&'static str] {
        &[]
    }

    /// Convert raw bytes to text.
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Decode UTF-8, silently dropping invalid byte sequences.
pub fn decode_lossy(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                // `None` means the input ends mid-sequence.
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}
