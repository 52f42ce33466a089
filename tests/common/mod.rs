//! Shared helpers for router-level tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use gemini_gateway::api::{self, GatewayState};
use gemini_gateway::services::generation::{
    ContentPart, GenerationError, GenerationRequest, GenerationResult, GenerativeModel,
};
use gemini_gateway::services::uploads::UploadStore;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use tower::ServiceExt;

/// How the stub answers
pub enum Reply {
    /// `"echo: <first text part>"`
    Echo,
    /// Fail with a transport error carrying this message
    Fail(String),
}

/// In-memory model that records every call
pub struct StubModel {
    reply: Reply,
    calls: Mutex<Vec<Vec<ContentPart>>>,
    watch_dir: Option<PathBuf>,
    seen_files: Mutex<Vec<Vec<PathBuf>>>,
    rendezvous: Option<(Barrier, Barrier)>,
}

impl StubModel {
    pub fn echo() -> Self {
        Self::new(Reply::Echo)
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Reply::Fail(message.to_string()))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
            watch_dir: None,
            seen_files: Mutex::new(Vec::new()),
            rendezvous: None,
        }
    }

    /// Record the files present in `dir` while each call is in flight
    pub fn watching(mut self, dir: &Path) -> Self {
        self.watch_dir = Some(dir.to_path_buf());
        self
    }

    /// Hold each call until `n` calls are in flight at once
    pub fn rendezvous(mut self, n: usize) -> Self {
        self.rendezvous = Some((Barrier::new(n), Barrier::new(n)));
        self
    }

    pub fn calls(&self) -> Vec<Vec<ContentPart>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seen_files(&self) -> Vec<Vec<PathBuf>> {
        self.seen_files.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        self.calls.lock().unwrap().push(request.parts().to_vec());

        if let Some((arrived, release)) = &self.rendezvous {
            arrived.wait().await;
            if let Some(dir) = &self.watch_dir {
                self.seen_files.lock().unwrap().push(list_files(dir));
            }
            release.wait().await;
        } else if let Some(dir) = &self.watch_dir {
            self.seen_files.lock().unwrap().push(list_files(dir));
        }

        match &self.reply {
            Reply::Echo => {
                let first_text = request
                    .parts()
                    .iter()
                    .find_map(|part| match part {
                        ContentPart::Text(text) => Some(text.clone()),
                        ContentPart::Binary(_) => None,
                    })
                    .unwrap_or_default();
                Ok(GenerationResult {
                    text: format!("echo: {}", first_text),
                })
            }
            Reply::Fail(message) => Err(GenerationError::Transport(message.clone())),
        }
    }
}

/// Files directly inside `dir`, sorted
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    files.sort();
    files
}

/// Build the gateway router around a stub model
pub fn test_router(model: Arc<StubModel>, upload_dir: &Path, max_upload_bytes: usize) -> axum::Router {
    let state = GatewayState::new(model, UploadStore::new(upload_dir));
    api::router(state, max_upload_bytes)
}

/// One multipart field
pub enum FormPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
}

pub const BOUNDARY: &str = "gateway-test-boundary";

/// Encode fields as a `multipart/form-data` body
pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart body
pub async fn post_multipart(router: axum::Router, uri: &str, parts: &[FormPart<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// POST a JSON body
pub async fn post_json(router: axum::Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
