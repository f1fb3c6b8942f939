//! Process-lifetime, append-only document store.

use parking_lot::RwLock;
use tracing::debug;

use crate::types::{DocumentSummary, UploadedDocument};
use docquery_core::{Error, Result};

/// Ordered collection of uploaded documents.
///
/// Indices are assigned at append time and never change. Create one per
/// process and share it behind an `Arc`; tests build their own instances.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: RwLock<Vec<UploadedDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document and return its index.
    pub fn append(&self, doc: UploadedDocument) -> usize {
        // Size read and push happen under one write guard.
        let mut docs = self.docs.write();
        let index = docs.len();
        debug!(index, filename = %doc.filename, "Appending document");
        docs.push(doc);
        index
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Snapshot of every full text, in store order.
    pub fn all(&self) -> Vec<String> {
        self.docs
            .read()
            .iter()
            .map(|d| d.full_text().to_string())
            .collect()
    }

    /// Full texts at `indices`, in the order given.
    pub fn at(&self, indices: &[usize]) -> Result<Vec<String>> {
        let docs = self.docs.read();
        indices
            .iter()
            .map(|&index| {
                docs.get(index)
                    .map(|d| d.full_text().to_string())
                    .ok_or(Error::IndexOutOfRange {
                        index,
                        len: docs.len(),
                    })
            })
            .collect()
    }

    /// Clone of the document at `index`, if any.
    pub fn get(&self, index: usize) -> Option<UploadedDocument> {
        self.docs.read().get(index).cloned()
    }

    /// Listing of every document without full texts.
    pub fn summaries(&self) -> Vec<DocumentSummary> {
        self.docs
            .read()
            .iter()
            .enumerate()
            .map(|(index, d)| DocumentSummary {
                index,
                filename: d.filename.clone(),
                content_type: d.content_type.clone(),
                format: d.format.clone(),
                preview: d.preview().to_string(),
                length: d.full_text().chars().count(),
                uploaded_at: d.uploaded_at,
            })
            .collect()
    }
}
