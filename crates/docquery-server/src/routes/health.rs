//! Liveness and status.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "documents": state.store.len(),
        "llmProvider": state.pipeline.model().provider().map(|p| p.to_string()),
        "llm": state.llm_config.to_response(),
        "formats": state.registry.formats(),
    }))
}
