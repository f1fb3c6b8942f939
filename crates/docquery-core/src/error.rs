//! Error types for DocQuery.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Document index {index} out of range (store has {len} documents)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Upstream model error: {0}")]
    Upstream(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_)
                | Self::Parse(_)
                | Self::IndexOutOfRange { .. }
                | Self::InvalidRequest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message_carries_declared_type() {
        let err = Error::UnsupportedFormat("image/png".into());
        assert_eq!(err.to_string(), "Unsupported file type: image/png");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_upstream_is_server_error() {
        assert!(!Error::Upstream("quota exceeded".into()).is_client_error());
        assert!(!Error::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = Error::IndexOutOfRange { index: 5, len: 2 };
        assert!(err.to_string().contains("5"));
        assert!(err.to_string().contains("2 documents"));
        assert!(err.is_client_error());
    }
}
