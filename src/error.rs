//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! Gateway routes answer failures with `{ "error": message }`; the chat route
//! keeps its own `{ "reply": message }` shape via [`ChatError`].

use crate::services::generation::GenerationError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required request field is missing or blank
    #[error("{0}")]
    InvalidRequest(String),

    /// No file was attached under the expected multipart field
    #[error("No file uploaded in field '{0}'")]
    UploadMissing(String),

    /// The multipart body could not be read (malformed, or over the size limit)
    #[error("Failed to read multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// The model capability failed; its message is surfaced unchanged
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UploadMissing(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Generation(GenerationError::EmptyRequest) => StatusCode::BAD_REQUEST,
            AppError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Errors from the chat route, which answers under `reply` instead of `error`
#[derive(Error, Debug)]
pub enum ChatError {
    /// `message` missing or blank
    #[error("Message is required.")]
    MissingMessage,

    /// Generation failed; details are logged, not returned
    #[error("Something went wrong.")]
    Generation(#[from] GenerationError),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChatError::MissingMessage => StatusCode::BAD_REQUEST,
            ChatError::Generation(e) => {
                tracing::error!(error = %e, "Chat generation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "reply": self.to_string() }))).into_response()
    }
}
