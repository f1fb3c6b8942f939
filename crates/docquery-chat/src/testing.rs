//! Scripted model for unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::providers::GenerativeModel;
use crate::types::ModelTier;
use docquery_core::{Error, Result};

/// Replays canned responses in order and records every prompt.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, ModelTier)>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, ModelTier)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, prompt: &str, tier: ModelTier) -> Result<String> {
        self.calls.lock().push((prompt.to_string(), tier));
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Internal("script exhausted".into())))
    }
}
