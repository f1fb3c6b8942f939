//! Grounded answer generation.

use tracing::debug;

use crate::providers::GenerativeModel;
use crate::types::ModelTier;
use docquery_core::Result;

/// Prompt asking the model to answer `question` from `context`.
pub fn build_answer_prompt(question: &str, context: &str) -> String {
    format!("Context:\n{}\n\nQuestion: {}\n\nAnswer:", context, question)
}

/// Ask the standard-tier model and return its response unmodified.
pub async fn answer(model: &dyn GenerativeModel, question: &str, context: &str) -> Result<String> {
    let prompt = build_answer_prompt(question, context);
    debug!(
        context_chars = context.len(),
        prompt_chars = prompt.len(),
        "Requesting answer"
    );
    model.generate(&prompt, ModelTier::Standard).await
}
