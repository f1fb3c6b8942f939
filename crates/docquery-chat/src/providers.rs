//! External LLM provider clients.
//!
//! Each call is a single non-streaming request. OpenAI and Groq share the
//! chat-completions format; Gemini and Anthropic have their own.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::{LLMConfig, ResolvedProvider};
use crate::types::{LLMProvider, ModelTier};
use docquery_core::{Error, Result};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const NO_PROVIDER_MESSAGE: &str = "No LLM provider configured";

/// A text-generation backend.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send a single prompt and return the raw response text.
    async fn generate(&self, prompt: &str, tier: ModelTier) -> Result<String>;

    /// Provider behind this model, if any.
    fn provider(&self) -> Option<LLMProvider> {
        None
    }
}

/// HTTP client for the resolved provider.
pub struct ProviderClient {
    client: Client,
    resolved: ResolvedProvider,
    max_tokens: usize,
}

impl ProviderClient {
    pub fn new(resolved: ResolvedProvider, max_tokens: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            resolved,
            max_tokens,
        })
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Standard => &self.resolved.standard_model,
            ModelTier::Fast => &self.resolved.fast_model,
        }
    }

    async fn post(&self, request: reqwest::RequestBuilder, body: &Value) -> Result<Value> {
        let response = request
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = %self.resolved.provider, %status, "Provider returned an error");
            return Err(Error::Upstream(format!("API error {}: {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Upstream(format!("Invalid response body: {}", e)))
    }
}

#[async_trait]
impl GenerativeModel for ProviderClient {
    async fn generate(&self, prompt: &str, tier: ModelTier) -> Result<String> {
        let model = self.model_for(tier);
        let api_key = &self.resolved.api_key;
        debug!(
            provider = %self.resolved.provider,
            model,
            prompt_chars = prompt.len(),
            "Calling model"
        );

        match self.resolved.provider {
            LLMProvider::Gemini => {
                let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, model);
                let body = gemini_body(prompt, self.max_tokens);
                let request = self.client.post(&url).header("x-goog-api-key", api_key);
                parse_gemini(&self.post(request, &body).await?)
            }
            LLMProvider::OpenAI | LLMProvider::Groq => {
                let url = if self.resolved.provider == LLMProvider::OpenAI {
                    OPENAI_URL
                } else {
                    GROQ_URL
                };
                let body = chat_completions_body(prompt, model, self.max_tokens);
                let request = self
                    .client
                    .post(url)
                    .header("Authorization", format!("Bearer {}", api_key));
                parse_chat_completions(&self.post(request, &body).await?)
            }
            LLMProvider::Anthropic => {
                let body = anthropic_body(prompt, model, self.max_tokens);
                let request = self
                    .client
                    .post(ANTHROPIC_URL)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION);
                parse_anthropic(&self.post(request, &body).await?)
            }
        }
    }

    fn provider(&self) -> Option<LLMProvider> {
        Some(self.resolved.provider)
    }
}

/// Stand-in used when no provider key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableModel;

#[async_trait]
impl GenerativeModel for UnavailableModel {
    async fn generate(&self, _prompt: &str, _tier: ModelTier) -> Result<String> {
        Err(Error::Upstream(NO_PROVIDER_MESSAGE.into()))
    }
}

/// Build the model for the configured provider.
///
/// Falls back to [`UnavailableModel`] when no provider can be resolved.
pub fn create_model(config: &LLMConfig, timeout: Duration) -> Result<Arc<dyn GenerativeModel>> {
    match config.resolve_provider() {
        Some(resolved) => {
            info!(
                provider = %resolved.provider,
                answer_model = %resolved.standard_model,
                rewrite_model = %resolved.fast_model,
                "LLM provider ready"
            );
            Ok(Arc::new(ProviderClient::new(resolved, config.max_tokens, timeout)?))
        }
        None => {
            warn!(
                preferred = %config.preferred_provider,
                "No LLM provider key configured; queries will fail until one is set"
            );
            Ok(Arc::new(UnavailableModel))
        }
    }
}

fn gemini_body(prompt: &str, max_tokens: usize) -> Value {
    json!({
        "contents": [{"role": "user", "parts": [{"text": prompt}]}],
        "generationConfig": {"maxOutputTokens": max_tokens},
    })
}

fn chat_completions_body(prompt: &str, model: &str, max_tokens: usize) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "max_tokens": max_tokens,
    })
}

fn anthropic_body(prompt: &str, model: &str, max_tokens: usize) -> Value {
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [{"role": "user", "content": prompt}],
    })
}

/// Concatenated text parts of the first Gemini candidate.
fn parse_gemini(body: &Value) -> Result<String> {
    let parts = body["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| {
            let reason = body["promptFeedback"]["blockReason"]
                .as_str()
                .or_else(|| body["candidates"][0]["finishReason"].as_str())
                .unwrap_or("no candidates");
            Error::Upstream(format!("Gemini returned no text ({})", reason))
        })?;
    Ok(parts.iter().filter_map(|p| p["text"].as_str()).collect())
}

fn parse_chat_completions(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Upstream("Response has no message content".into()))
}

fn parse_anthropic(body: &Value) -> Result<String> {
    let blocks = body["content"]
        .as_array()
        .ok_or_else(|| Error::Upstream("Response has no content blocks".into()))?;
    Ok(blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect())
}
