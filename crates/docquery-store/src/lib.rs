//! DocQuery Store — in-memory document store and context assembly.

pub mod context;
pub mod memory;
pub mod types;

pub use context::{assemble, NO_DOCUMENTS_CONTEXT};
pub use memory::DocumentStore;
pub use types::{truncate_chars, ContextSelection, DocumentSummary, UploadedDocument};
