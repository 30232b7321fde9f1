//! Error handling for the chat pipeline
//!
//! Idiomatic error types using thiserror, converted to a uniform JSON error
//! response at the request boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;
use tracing::warn;

/// Main error type for the chat-with-database pipeline
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Could not identify SQL query in agent response: {response}")]
    Extraction { response: String },

    #[error("The generated query doesn't appear to be valid SQL: {candidate}")]
    Validation { candidate: String },

    #[error("Query execution error: {0}")]
    Execution(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(#[source] anyhow::Error),
}

impl ChatError {
    /// Whether the generation loop may retry once more after this error.
    ///
    /// Only extraction and validation failures are retryable; everything
    /// else aborts the request immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChatError::Extraction { .. } | ChatError::Validation { .. }
        )
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        warn!("request failed: {}", self);
        let detail = format!("Error processing query: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response()
    }
}
