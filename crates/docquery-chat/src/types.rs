//! Chat types matching the web client's API surface.

use serde::{Deserialize, Serialize};

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    Gemini,
    OpenAI,
    Anthropic,
    Groq,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Groq => write!(f, "groq"),
        }
    }
}

/// Model size class used for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Answers to user questions.
    Standard,
    /// Cheap, low-latency calls such as query rewriting.
    Fast,
}

/// One prior question/answer exchange, supplied per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// Incoming search request.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    /// Texts to ground on. When absent the server's document store is used.
    #[serde(default, rename = "fileTexts", alias = "document_texts")]
    pub document_texts: Option<Vec<String>>,
    #[serde(default, rename = "selectedFiles", alias = "selected_indices")]
    pub selected_indices: Vec<usize>,
    #[serde(default, rename = "chatHistory", alias = "chat_history")]
    pub chat_history: Vec<ChatTurn>,
}

/// Whether an answer was grounded in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    General,
    Document,
}

/// Search response.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub mode: QueryMode,
    #[serde(rename = "standaloneQuestion", skip_serializing_if = "Option::is_none")]
    pub standalone_question: Option<String>,
}

/// Direct question against caller-supplied context.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub context: String,
}

/// LLM config response (keys masked).
#[derive(Debug, Clone, Serialize)]
pub struct LLMConfigResponse {
    #[serde(rename = "preferredProvider")]
    pub preferred_provider: String,
    #[serde(rename = "geminiConfigured")]
    pub gemini_configured: bool,
    #[serde(rename = "openaiConfigured")]
    pub openai_configured: bool,
    #[serde(rename = "anthropicConfigured")]
    pub anthropic_configured: bool,
    #[serde(rename = "groqConfigured")]
    pub groq_configured: bool,
    #[serde(rename = "activeProvider")]
    pub active_provider: Option<String>,
    #[serde(rename = "answerModel")]
    pub answer_model: Option<String>,
    #[serde(rename = "rewriteModel")]
    pub rewrite_model: Option<String>,
}
