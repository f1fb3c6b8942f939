//! Question answering over uploaded documents with external LLMs
//! (Gemini/OpenAI/Anthropic/Groq).
//!
//! Follow-up questions are rewritten into standalone ones before answering.

pub mod answer;
pub mod config;
pub mod pipeline;
pub mod providers;
pub mod rewrite;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{LLMConfig, ResolvedProvider};
pub use pipeline::QueryPipeline;
pub use providers::{create_model, GenerativeModel, ProviderClient, UnavailableModel};
pub use rewrite::RewriteOutcome;
pub use types::*;
