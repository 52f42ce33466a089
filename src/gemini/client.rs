//! Gemini API client
//!
//! Direct HTTP client for the `generateContent` endpoint. One instance is
//! built at startup and shared by every request (connection pooling).

use crate::config::GeminiConfig;
use crate::gemini::types::{
    GeminiApiRequest, GeminiApiResponse, InlineData, RequestContent, RequestPart,
};
use crate::services::generation::{
    ContentPart, GenerationError, GenerationRequest, GenerationResult, GenerativeModel, PartData,
};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Header carrying the API key, which keeps it out of request URLs and error messages
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// * Returns `GenerationError::Transport` if the HTTP client cannot be constructed
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.trim_start_matches("models/").to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Model name without the `models/` prefix
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Convert ordered content parts into the Gemini request body
///
/// Raw parts are base64-encoded here since the REST API only carries inline data;
/// parts that are already base64 pass through untouched.
pub fn build_request(request: GenerationRequest) -> GeminiApiRequest {
    let parts = request
        .into_parts()
        .into_iter()
        .map(|part| match part {
            ContentPart::Text(text) => RequestPart::Text { text },
            ContentPart::Binary(binary) => {
                let data = match binary.data {
                    PartData::Raw(bytes) => base64::engine::general_purpose::STANDARD.encode(&bytes),
                    PartData::Base64(encoded) => encoded,
                };
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: binary.mime_type,
                        data,
                    },
                }
            }
        })
        .collect();

    GeminiApiRequest {
        contents: vec![RequestContent {
            role: "user".to_string(),
            parts,
        }],
    }
}

/// Pull the generated text out of a parsed response
///
/// Text from every part of the first candidate is concatenated.
pub fn extract_text(parsed: GeminiApiResponse) -> Result<String, GenerationError> {
    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::Blocked(reason));
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::NoCandidates)?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason.filter(|r| r == "SAFETY") {
            return Err(GenerationError::Blocked(reason));
        }
        return Err(GenerationError::EmptyText);
    }

    Ok(text)
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let part_count = request.parts().len();
        let body = build_request(request);

        tracing::debug!(
            model = %self.model,
            part_count = part_count,
            "Calling Gemini API"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            if status_code == 429 {
                return Err(GenerationError::RateLimited {
                    status: status_code,
                    body: error_body,
                });
            }

            return Err(GenerationError::Api {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| {
                GenerationError::Transport(format!(
                    "Failed to read response body: {}",
                    e.without_url()
                ))
            })?;

        let parsed: GeminiApiResponse = serde_json::from_str(&response_body).map_err(|e| {
            GenerationError::InvalidResponse(format!("{} - Response body: {}", e, response_body))
        })?;

        let text = extract_text(parsed)?;

        tracing::debug!(
            response_len = text.len(),
            "Successfully received response from Gemini API"
        );

        Ok(GenerationResult { text })
    }
}
