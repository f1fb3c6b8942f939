//! Conversational query rewriting.
//!
//! Follow-up questions such as "what about the second one?" are rewritten into
//! standalone questions using the prior turns before answering.

use tracing::{debug, info, warn};

use crate::providers::GenerativeModel;
use crate::types::{ChatTurn, ModelTier};

/// Result of attempting a rewrite. Never an error: failures fall back to the
/// original question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No history, so the question was used as-is without a model call.
    Passthrough(String),
    Rewritten { original: String, standalone: String },
    /// The model call failed or returned nothing.
    Fallback { question: String, reason: String },
}

impl RewriteOutcome {
    /// Question to send downstream.
    pub fn question(&self) -> &str {
        match self {
            Self::Passthrough(q) => q,
            Self::Rewritten { standalone, .. } => standalone,
            Self::Fallback { question, .. } => question,
        }
    }

    pub fn into_question(self) -> String {
        match self {
            Self::Passthrough(q) => q,
            Self::Rewritten { standalone, .. } => standalone,
            Self::Fallback { question, .. } => question,
        }
    }

    /// The rewritten question, if the model produced one.
    pub fn standalone(&self) -> Option<&str> {
        match self {
            Self::Rewritten { standalone, .. } => Some(standalone),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// One `User:`/`AI:` pair per turn, in order.
pub fn render_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("User: {}\nAI: {}\n", turn.question, turn.answer))
        .collect()
}

pub fn build_rewrite_prompt(history: &[ChatTurn], question: &str) -> String {
    format!(
        "Given the following chat history and a new user question, rewrite the user's question \
         to be a standalone question that can be understood without the history. If the question \
         is already standalone, just return it as is.\n\n\
         Chat History:\n{}\n\n\
         User Question:\n{}\n\n\
         Standalone Question:",
        render_history(history),
        question
    )
}

/// Rewrite `question` against `history` using the fast model tier.
pub async fn rewrite(
    model: &dyn GenerativeModel,
    history: &[ChatTurn],
    question: &str,
) -> RewriteOutcome {
    if history.is_empty() {
        return RewriteOutcome::Passthrough(question.to_string());
    }

    let prompt = build_rewrite_prompt(history, question);
    debug!(turns = history.len(), prompt_chars = prompt.len(), "Rewriting question");

    match model.generate(&prompt, ModelTier::Fast).await {
        Ok(response) => {
            let standalone = response.trim();
            if standalone.is_empty() {
                warn!("Query rewrite returned empty text, using original question");
                return RewriteOutcome::Fallback {
                    question: question.to_string(),
                    reason: "empty response".into(),
                };
            }
            info!(original = question, rewritten = standalone, "Rewrote question");
            RewriteOutcome::Rewritten {
                original: question.to_string(),
                standalone: standalone.to_string(),
            }
        }
        Err(e) => {
            warn!("Query rewrite failed, using original question: {}", e);
            RewriteOutcome::Fallback {
                question: question.to_string(),
                reason: e.to_string(),
            }
        }
    }
}
