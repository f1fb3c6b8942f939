//! DocQuery Core — shared error type and server configuration.

pub mod config;
pub mod error;

pub use config::{DocQueryConfig, DEFAULT_PREVIEW_CHARS};
pub use error::{Error, Result};
