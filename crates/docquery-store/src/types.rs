//! Data types for uploaded documents and context selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document accepted by an upload, with its extracted text.
///
/// Immutable once created; identified only by its position in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    full_text: String,
    preview: String,
    pub filename: String,
    pub content_type: String,
    /// Name of the extractor that produced the text (`pdf`, `csv`, ...).
    pub format: String,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedDocument {
    /// Build a document, deriving the preview from the first `preview_chars` characters.
    pub fn new(
        full_text: String,
        preview_chars: usize,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        let preview = truncate_chars(&full_text, preview_chars).to_string();
        Self {
            full_text,
            preview,
            filename: filename.into(),
            content_type: content_type.into(),
            format: format.into(),
            uploaded_at: Utc::now(),
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }
}

/// Listing entry for an uploaded document (no full text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub index: usize,
    pub filename: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub format: String,
    pub preview: String,
    /// Length of the full text in characters.
    pub length: usize,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

/// Which documents contribute to a query's context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextSelection {
    /// Every document, in store order.
    #[default]
    All,
    /// Only these documents, in the order given.
    Indices(Vec<usize>),
}

impl ContextSelection {
    /// An empty index list means "use everything".
    pub fn from_indices(indices: Vec<usize>) -> Self {
        if indices.is_empty() {
            Self::All
        } else {
            Self::Indices(indices)
        }
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
