//! Context assembly: selected document texts → one grounding blob.

use crate::types::ContextSelection;
use docquery_core::{Error, Result};

/// Context sent when there is nothing to ground on.
pub const NO_DOCUMENTS_CONTEXT: &str = "No documents provided. Answer normally.";

/// Separator placed between document texts.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Concatenate the selected documents into a single context string.
///
/// An empty document list always yields [`NO_DOCUMENTS_CONTEXT`], whatever the
/// selection. Explicit indices are honored in the order given.
pub fn assemble(documents: &[String], selection: &ContextSelection) -> Result<String> {
    if documents.is_empty() {
        return Ok(NO_DOCUMENTS_CONTEXT.to_string());
    }

    match selection {
        ContextSelection::All => Ok(documents.join(DOCUMENT_SEPARATOR)),
        ContextSelection::Indices(indices) => {
            let selected = indices
                .iter()
                .map(|&index| {
                    documents
                        .get(index)
                        .map(String::as_str)
                        .ok_or(Error::IndexOutOfRange {
                            index,
                            len: documents.len(),
                        })
                })
                .collect::<Result<Vec<&str>>>()?;
            Ok(selected.join(DOCUMENT_SEPARATOR))
        }
    }
}
