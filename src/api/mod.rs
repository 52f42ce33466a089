//! API module
//!
//! Contains HTTP request handlers for the gateway endpoints and the router
//! that wires them to a [`GatewayState`].

pub mod media;
pub mod text;

use crate::services::generation::GenerativeModel;
use crate::services::uploads::UploadStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handler state
///
/// Cloned per request; the model client and upload store are the only
/// process-wide collaborators.
#[derive(Clone)]
pub struct GatewayState {
    /// Model capability used by every route
    pub model: Arc<dyn GenerativeModel>,
    /// Where multipart files are saved for the duration of a request
    pub uploads: UploadStore,
}

impl GatewayState {
    /// Build state from an already constructed model client
    pub fn new(model: Arc<dyn GenerativeModel>, uploads: UploadStore) -> Self {
        Self { model, uploads }
    }
}

/// Success body shared by the generate routes
#[derive(Debug, Serialize, Deserialize)]
pub struct OutputResponse {
    /// Generated text
    pub output: String,
}

#[allow(missing_docs)]
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the gateway routes
///
/// Upload routes accept bodies up to `max_upload_bytes`; middleware, CORS
/// and static files are layered on by the binary.
pub fn router(state: GatewayState, max_upload_bytes: usize) -> Router {
    let uploads = Router::new()
        .route("/generate-from-image", post(media::generate_from_image))
        .route("/generate-from-document", post(media::generate_from_document))
        .route("/generate-from-audio", post(media::generate_from_audio))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/generate-text", post(text::generate_text))
        .route("/api/chat", post(text::chat))
        .merge(uploads)
        .with_state(state)
}
