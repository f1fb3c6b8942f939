//! Question routes.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use super::error_response;
use crate::state::AppState;
use docquery_chat::{AskRequest, QueryRequest};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", post(search))
        .route("/ask", post(ask))
}

/// POST /search — answer a question over uploaded or supplied documents.
async fn search(State(state): State<Arc<AppState>>, Json(req): Json<QueryRequest>) -> Response {
    match state.pipeline.run(&req, &state.store).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// POST /ask — answer a question against form-supplied context.
async fn ask(State(state): State<Arc<AppState>>, Form(req): Form<AskRequest>) -> Response {
    match state.pipeline.ask(&req.question, &req.context).await {
        Ok(answer) => (StatusCode::OK, Json(json!({ "answer": answer }))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
