//! Document routes: upload and listing.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::error_response;
use crate::state::AppState;
use docquery_core::Error;
use docquery_ingest::{Ingester, Upload};

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/documents", get(list_documents))
}

/// POST /upload — extract a single file and store it.
///
/// Responds with the text preview and the document's index.
async fn upload_file(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (e.status(), Json(json!({ "error": e.body_text() }))).into_response();
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return (e.status(), Json(json!({ "error": e.body_text() }))).into_response();
            }
        };

        // Extraction is CPU-bound (PDF parsing in particular).
        let worker_state = state.clone();
        let result = tokio::task::spawn_blocking(move || {
            Ingester::new(
                &worker_state.registry,
                &worker_state.store,
                worker_state.config.preview_chars,
            )
            .ingest(Upload {
                content_type: &content_type,
                filename: &filename,
                bytes: &bytes,
            })
        })
        .await
        .unwrap_or_else(|e| Err(Error::Internal(format!("Extraction task failed: {}", e))));

        return match result {
            Ok(outcome) => (
                StatusCode::OK,
                Json(json!({
                    "text": outcome.preview,
                    "index": outcome.index,
                })),
            )
                .into_response(),
            Err(e) => error_response(&e).into_response(),
        };
    }

    error_response(&Error::InvalidRequest(format!(
        "missing multipart field '{}'",
        FILE_FIELD
    )))
    .into_response()
}

/// GET /documents — list stored documents without their full text.
async fn list_documents(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let documents = state.store.summaries();
    Json(json!({
        "total": documents.len(),
        "documents": documents,
    }))
}
