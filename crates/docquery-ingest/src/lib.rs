//! DocQuery Ingest — format extractors, extractor registry, upload ingestion.

pub mod formats;
pub mod ingest;
pub mod registry;

pub use formats::{decode_lossy, Extractor};
pub use ingest::{Ingester, Upload, UploadOutcome};
pub use registry::{Extraction, ExtractorRegistry};
