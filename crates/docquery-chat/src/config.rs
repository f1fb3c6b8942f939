//! LLM configuration and provider selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{LLMConfigResponse, LLMProvider};
use docquery_core::{Error, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_FAST_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_FAST_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ANTHROPIC_FAST_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_FAST_MODEL: &str = "llama-3.1-8b-instant";

pub const DEFAULT_MAX_TOKENS: usize = 2048;

/// LLM configuration, read from an optional JSON file with env fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_fast_model")]
    pub gemini_fast_model: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_fast_model")]
    pub openai_fast_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_anthropic_fast_model")]
    pub anthropic_fast_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_groq_fast_model")]
    pub groq_fast_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}
fn default_gemini_fast_model() -> String {
    DEFAULT_GEMINI_FAST_MODEL.into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_openai_fast_model() -> String {
    DEFAULT_OPENAI_FAST_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_anthropic_fast_model() -> String {
    DEFAULT_ANTHROPIC_FAST_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_groq_fast_model() -> String {
    DEFAULT_GROQ_FAST_MODEL.into()
}
fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            gemini_api_key: None,
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_fast_model: default_gemini_fast_model(),
            openai_model: default_openai_model(),
            openai_fast_model: default_openai_fast_model(),
            anthropic_model: default_anthropic_model(),
            anthropic_fast_model: default_anthropic_fast_model(),
            groq_model: default_groq_model(),
            groq_fast_model: default_groq_fast_model(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Provider chosen for this process, with its credentials and model names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: LLMProvider,
    pub api_key: String,
    /// Model used for answers.
    pub standard_model: String,
    /// Model used for query rewriting.
    pub fast_model: String,
}

impl LLMConfig {
    /// Load config from an optional file, falling back to env vars and defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`LLMConfig::load`] with an explicit variable lookup.
    pub fn load_with<F>(config_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                let config: LLMConfig = serde_json::from_str(&raw).map_err(|e| {
                    Error::Config(format!("Invalid LLM config {}: {}", path.display(), e))
                })?;
                info!("Loaded LLM config from {}", path.display());
                config
            }
            Some(path) => {
                warn!("LLM config {} not found, using defaults", path.display());
                LLMConfig::default()
            }
            None => LLMConfig::default(),
        };

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Env vars as fallback for API keys
        if config.gemini_api_key.is_none() {
            config.gemini_api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY"));
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = non_empty("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = non_empty("ANTHROPIC_API_KEY");
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = non_empty("GROQ_API_KEY");
        }
        if let Some(provider) = non_empty("DOCQUERY_LLM_PROVIDER") {
            config.preferred_provider = provider.trim().to_ascii_lowercase();
        }

        Ok(config)
    }

    fn resolve(&self, provider: LLMProvider) -> Option<ResolvedProvider> {
        let (key, standard, fast) = match provider {
            LLMProvider::Gemini => (&self.gemini_api_key, &self.gemini_model, &self.gemini_fast_model),
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model, &self.openai_fast_model),
            LLMProvider::Anthropic => (
                &self.anthropic_api_key,
                &self.anthropic_model,
                &self.anthropic_fast_model,
            ),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model, &self.groq_fast_model),
        };
        key.as_ref().map(|k| ResolvedProvider {
            provider,
            api_key: k.clone(),
            standard_model: standard.clone(),
            fast_model: fast.clone(),
        })
    }

    /// Resolve which provider and models to use.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "gemini" => self.resolve(LLMProvider::Gemini),
                "openai" => self.resolve(LLMProvider::OpenAI),
                "anthropic" => self.resolve(LLMProvider::Anthropic),
                "groq" => self.resolve(LLMProvider::Groq),
                _ => None,
            };
        }

        // Auto mode: Gemini > Anthropic > Groq > OpenAI
        [
            LLMProvider::Gemini,
            LLMProvider::Anthropic,
            LLMProvider::Groq,
            LLMProvider::OpenAI,
        ]
        .into_iter()
        .find_map(|p| self.resolve(p))
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LLMConfigResponse {
        let resolved = self.resolve_provider();
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            gemini_configured: self.gemini_api_key.is_some(),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            active_provider: resolved.as_ref().map(|r| r.provider.to_string()),
            answer_model: resolved.as_ref().map(|r| r.standard_model.clone()),
            rewrite_model: resolved.map(|r| r.fast_model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_keys_resolve_nothing() {
        let config = LLMConfig::load_with(None, lookup(&[])).unwrap();
        assert_eq!(config.preferred_provider, "auto");
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_auto_prefers_gemini() {
        let config = LLMConfig::load_with(
            None,
            lookup(&[("OPENAI_API_KEY", "sk-o"), ("GOOGLE_API_KEY", "g-key")]),
        )
        .unwrap();
        let resolved = config.resolve_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::Gemini);
        assert_eq!(resolved.api_key, "g-key");
        assert_eq!(resolved.standard_model, "gemini-2.5-flash");
        assert_eq!(resolved.fast_model, "gemini-1.5-flash");
    }

    #[test]
    fn test_auto_order_without_gemini() {
        let config = LLMConfig::load_with(
            None,
            lookup(&[("OPENAI_API_KEY", "sk-o"), ("GROQ_API_KEY", "gsk")]),
        )
        .unwrap();
        assert_eq!(config.resolve_provider().unwrap().provider, LLMProvider::Groq);
    }

    #[test]
    fn test_explicit_provider_requires_key() {
        let config = LLMConfig::load_with(
            None,
            lookup(&[("DOCQUERY_LLM_PROVIDER", "Anthropic"), ("GEMINI_API_KEY", "g")]),
        )
        .unwrap();
        assert_eq!(config.preferred_provider, "anthropic");
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_blank_env_key_ignored() {
        let config = LLMConfig::load_with(None, lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_file_values_override_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm.json");
        std::fs::write(
            &path,
            r#"{"preferred_provider":"openai","openai_api_key":"from-file","openai_fast_model":"gpt-4.1-nano"}"#,
        )
        .unwrap();

        let config =
            LLMConfig::load_with(Some(path.as_path()), lookup(&[("OPENAI_API_KEY", "from-env")])).unwrap();
        let resolved = config.resolve_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::OpenAI);
        assert_eq!(resolved.api_key, "from-file");
        assert_eq!(resolved.standard_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(resolved.fast_model, "gpt-4.1-nano");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            LLMConfig::load_with(Some(dir.path().join("absent.json").as_path()), lookup(&[])).unwrap();
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = LLMConfig::load_with(Some(path.as_path()), lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_response_masks_keys() {
        let config =
            LLMConfig::load_with(None, lookup(&[("ANTHROPIC_API_KEY", "secret")])).unwrap();
        let response = config.to_response();
        assert!(response.anthropic_configured);
        assert!(!response.gemini_configured);
        assert_eq!(response.active_provider.as_deref(), Some("anthropic"));
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("secret"));
    }
}
