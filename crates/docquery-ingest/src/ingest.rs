//! Upload ingestion: bytes → extractor → document store.

use tracing::{info, warn};

use crate::registry::ExtractorRegistry;
use docquery_core::Result;
use docquery_store::{DocumentStore, UploadedDocument};

/// A single uploaded file as received from the transport.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub content_type: &'a str,
    pub filename: &'a str,
    pub bytes: &'a [u8],
}

/// Result of a successful upload. Only the preview is returned to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub index: usize,
    pub format: &'static str,
    pub preview: String,
}

/// Handles document ingestion: dispatch, extraction, and storage.
pub struct Ingester<'a> {
    registry: &'a ExtractorRegistry,
    store: &'a DocumentStore,
    preview_chars: usize,
}

impl<'a> Ingester<'a> {
    pub fn new(registry: &'a ExtractorRegistry, store: &'a DocumentStore, preview_chars: usize) -> Self {
        Self {
            registry,
            store,
            preview_chars,
        }
    }

    /// Extract an upload and append it to the store.
    ///
    /// Nothing is stored unless extraction succeeds.
    pub fn ingest(&self, upload: Upload<'_>) -> Result<UploadOutcome> {
        let extraction = self
            .registry
            .extract(upload.content_type, upload.filename, upload.bytes)
            .map_err(|e| {
                warn!(filename = upload.filename, content_type = upload.content_type, error = %e, "Upload rejected");
                e
            })?;

        let doc = UploadedDocument::new(
            extraction.text,
            self.preview_chars,
            upload.filename,
            upload.content_type,
            extraction.format,
        );
        let preview = doc.preview().to_string();
        let chars = doc.full_text().chars().count();
        let index = self.store.append(doc);

        info!(
            index,
            filename = upload.filename,
            format = extraction.format,
            chars,
            "Stored uploaded document"
        );

        Ok(UploadOutcome {
            index,
            format: extraction.format,
            preview,
        })
    }
}
