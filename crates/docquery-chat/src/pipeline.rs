//! Query pipeline: documents → context → rewrite → answer.

use std::sync::Arc;

use tracing::info;

use crate::answer::answer;
use crate::providers::GenerativeModel;
use crate::rewrite::rewrite;
use crate::types::{QueryMode, QueryRequest, QueryResponse};
use docquery_core::{Error, Result};
use docquery_store::{assemble, ContextSelection, DocumentStore};

/// Answers questions over uploaded documents with a shared model.
#[derive(Clone)]
pub struct QueryPipeline {
    model: Arc<dyn GenerativeModel>,
}

impl QueryPipeline {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<dyn GenerativeModel> {
        &self.model
    }

    /// Handle a search request.
    ///
    /// Documents come from the request when it carries them, otherwise from
    /// `store`. Selection errors surface before any model call.
    pub async fn run(&self, request: &QueryRequest, store: &DocumentStore) -> Result<QueryResponse> {
        validate_question(&request.question)?;

        let stored;
        let documents: &[String] = match &request.document_texts {
            Some(texts) => texts,
            None => {
                stored = store.all();
                &stored
            }
        };

        let mode = if documents.is_empty() {
            QueryMode::General
        } else {
            QueryMode::Document
        };
        let selection = ContextSelection::from_indices(request.selected_indices.clone());
        let context = assemble(documents, &selection)?;

        let outcome = rewrite(self.model.as_ref(), &request.chat_history, &request.question).await;
        let standalone_question = outcome.standalone().map(str::to_string);

        info!(
            mode = ?mode,
            documents = documents.len(),
            selected = request.selected_indices.len(),
            history = request.chat_history.len(),
            rewrite_fallback = outcome.is_fallback(),
            "Answering question"
        );

        let answer = answer(self.model.as_ref(), outcome.question(), &context).await?;
        Ok(QueryResponse {
            answer,
            mode,
            standalone_question,
        })
    }

    /// Answer `question` against caller-supplied context, no rewriting.
    pub async fn ask(&self, question: &str, context: &str) -> Result<String> {
        validate_question(question)?;
        answer(self.model.as_ref(), question, context).await
    }
}

fn validate_question(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(Error::InvalidRequest("question must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use crate::types::{ChatTurn, ModelTier};
    use docquery_store::{UploadedDocument, NO_DOCUMENTS_CONTEXT};

    fn request(question: &str) -> QueryRequest {
        QueryRequest {
            question: question.into(),
            document_texts: None,
            selected_indices: Vec::new(),
            chat_history: Vec::new(),
        }
    }

    fn pipeline(model: &Arc<ScriptedModel>) -> QueryPipeline {
        QueryPipeline::new(model.clone())
    }

    fn store_with(texts: &[&str]) -> DocumentStore {
        let store = DocumentStore::new();
        for text in texts {
            store.append(UploadedDocument::new(
                text.to_string(),
                8000,
                "f.txt",
                "text/plain",
                "text",
            ));
        }
        store
    }

    #[tokio::test]
    async fn test_general_mode_without_documents() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("4".into())]));
        let resp = pipeline(&model)
            .run(&request("What is 2+2?"), &DocumentStore::new())
            .await
            .unwrap();

        assert_eq!(resp.answer, "4");
        assert_eq!(resp.mode, QueryMode::General);
        assert!(resp.standalone_question.is_none());

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0,
            format!(
                "Context:\n{}\n\nQuestion: What is 2+2?\n\nAnswer:",
                NO_DOCUMENTS_CONTEXT
            )
        );
    }

    #[tokio::test]
    async fn test_selected_document_only() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("Bob".into())]));
        let store = store_with(&["Alice is 30.", "Bob is 25."]);
        let mut req = request("Who is 25?");
        req.selected_indices = vec![1];

        let resp = pipeline(&model).run(&req, &store).await.unwrap();
        assert_eq!(resp.mode, QueryMode::Document);
        let prompt = &model.calls()[0].0;
        assert!(prompt.starts_with("Context:\nBob is 25.\n\nQuestion:"));
        assert!(!prompt.contains("Alice"));
    }

    #[tokio::test]
    async fn test_request_documents_override_store() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("ok".into())]));
        let store = store_with(&["stored"]);
        let mut req = request("q");
        req.document_texts = Some(vec!["one".into(), "two".into()]);

        pipeline(&model).run(&req, &store).await.unwrap();
        assert!(model.calls()[0].0.starts_with("Context:\none\n\ntwo\n\nQuestion:"));
    }

    #[tokio::test]
    async fn test_empty_supplied_documents_is_general() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("ok".into())]));
        let mut req = request("q");
        req.document_texts = Some(Vec::new());
        let resp = pipeline(&model).run(&req, &store_with(&["stored"])).await.unwrap();
        assert_eq!(resp.mode, QueryMode::General);
    }

    #[tokio::test]
    async fn test_history_rewrites_before_answer() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("What is the capital of France?".into()),
            Ok("Paris".into()),
        ]));
        let mut req = request("And its capital?");
        req.chat_history = vec![ChatTurn {
            question: "Tell me about France".into(),
            answer: "A country in Europe.".into(),
        }];

        let resp = pipeline(&model).run(&req, &DocumentStore::new()).await.unwrap();
        assert_eq!(resp.answer, "Paris");
        assert_eq!(
            resp.standalone_question.as_deref(),
            Some("What is the capital of France?")
        );

        let calls = model.calls();
        assert_eq!(calls[0].1, ModelTier::Fast);
        assert_eq!(calls[1].1, ModelTier::Standard);
        assert!(calls[1].0.contains("Question: What is the capital of France?"));
    }

    #[tokio::test]
    async fn test_rewrite_failure_still_answers_original() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(Error::Upstream("boom".into())),
            Ok("answer".into()),
        ]));
        let mut req = request("follow up");
        req.chat_history = vec![ChatTurn {
            question: "a".into(),
            answer: "b".into(),
        }];

        let resp = pipeline(&model).run(&req, &DocumentStore::new()).await.unwrap();
        assert_eq!(resp.answer, "answer");
        assert!(resp.standalone_question.is_none());
        assert!(model.calls()[1].0.contains("Question: follow up"));
    }

    #[tokio::test]
    async fn test_bad_index_fails_before_model_call() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let store = store_with(&["a", "b"]);
        let mut req = request("q");
        req.selected_indices = vec![5];
        req.chat_history = vec![ChatTurn {
            question: "x".into(),
            answer: "y".into(),
        }];

        let err = pipeline(&model).run(&req, &store).await.unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 2 }));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let err = pipeline(&model)
            .run(&request("   "), &DocumentStore::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_answer_failure_propagates() {
        let model = Arc::new(ScriptedModel::new(vec![Err(Error::Upstream("quota".into()))]));
        let err = pipeline(&model)
            .run(&request("q"), &DocumentStore::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_ask_uses_given_context() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("blue".into())]));
        let text = pipeline(&model).ask("Sky colour?", "The sky is blue.").await.unwrap();
        assert_eq!(text, "blue");
        assert_eq!(
            model.calls()[0].0,
            "Context:\nThe sky is blue.\n\nQuestion: Sky colour?\n\nAnswer:"
        );
    }
}
