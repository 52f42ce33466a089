//! Text-only routes
//!
//! `POST /generate-text` answers with `{ output }` / `{ error }`, while
//! `POST /api/chat` answers with `{ reply }` in every case.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{GatewayState, OutputResponse};
use crate::error::{AppError, ChatError};
use crate::services::generation::GenerationRequest;

#[allow(missing_docs)]
#[derive(Debug, Default, Deserialize)]
pub struct GenerateTextRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Returns the text if it contains anything but whitespace
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// POST /generate-text - Generate text from a prompt
///
/// A body that is missing or not JSON is treated like one without `prompt`.
/// A missing or blank prompt is rejected with 400 before any model call,
/// rather than being forwarded and failing upstream as a 500.
pub async fn generate_text(
    State(state): State<GatewayState>,
    payload: Option<Json<GenerateTextRequest>>,
) -> Result<Json<OutputResponse>, AppError> {
    let Json(request) = payload.unwrap_or_default();
    let prompt = non_blank(request.prompt)
        .ok_or_else(|| AppError::InvalidRequest("Prompt is required.".to_string()))?;

    info!(prompt_len = prompt.len(), "Text generation request");

    let result = state.model.generate(GenerationRequest::text(prompt)?).await?;

    Ok(Json(OutputResponse {
        output: result.text,
    }))
}

/// POST /api/chat - Single-turn chat
pub async fn chat(
    State(state): State<GatewayState>,
    payload: Option<Json<ChatRequest>>,
) -> Result<Json<ChatResponse>, ChatError> {
    let Json(request) = payload.unwrap_or_default();
    let message = non_blank(request.message).ok_or(ChatError::MissingMessage)?;

    info!(message_len = message.len(), "Chat request");

    let result = state.model.generate(GenerationRequest::text(message)?).await?;

    Ok(Json(ChatResponse { reply: result.text }))
}
