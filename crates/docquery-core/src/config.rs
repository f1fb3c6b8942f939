//! Server configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Maximum characters of extracted text returned to the uploader.
pub const DEFAULT_PREVIEW_CHARS: usize = 8000;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Top-level DocQuery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocQueryConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Character budget for upload previews.
    pub preview_chars: usize,
    /// Largest accepted multipart body.
    pub max_upload_bytes: usize,
    /// Timeout applied to every outbound model request.
    pub llm_timeout: Duration,
    /// Optional JSON file with provider keys and model names.
    pub llm_config_file: Option<PathBuf>,
}

impl Default for DocQueryConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            llm_config_file: None,
        }
    }
}

impl DocQueryConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            preview_chars: parse_var(&lookup, "DOCQUERY_PREVIEW_CHARS")?
                .unwrap_or(defaults.preview_chars),
            max_upload_bytes: parse_var(&lookup, "DOCQUERY_MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            llm_timeout: parse_var(&lookup, "DOCQUERY_LLM_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.llm_timeout),
            llm_config_file: lookup("DOCQUERY_LLM_CONFIG")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        if config.preview_chars == 0 {
            return Err(Error::Config(
                "DOCQUERY_PREVIEW_CHARS must be greater than zero".into(),
            ));
        }

        Ok(config)
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(None),
    }
}
