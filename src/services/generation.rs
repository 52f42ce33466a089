//! Generation capability
//!
//! The seam between HTTP handlers and the hosted model. Handlers build a
//! [`GenerationRequest`] out of text and binary parts and hand it to a
//! [`GenerativeModel`]; the concrete provider lives in [`crate::gemini`].

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

/// Errors returned by a generation capability
///
/// The `Display` output of each variant is what clients see in `{ "error": ... }` bodies.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Request carried neither text nor a binary part
    #[error("Generation request must contain a prompt or at least one attachment")]
    EmptyRequest,

    /// No API key configured for the provider
    #[error("API key is empty")]
    MissingApiKey,

    /// HTTP transport failed before a response was received
    #[error("Failed to reach the model provider: {0}")]
    Transport(String),

    /// Provider rejected the call with HTTP 429
    #[error("Model provider rate limit exceeded (HTTP {status}): {body}")]
    RateLimited {
        /// HTTP status code
        status: u16,
        /// Raw error body
        body: String,
    },

    /// Provider returned any other non-success status
    #[error("Model provider returned error status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw error body
        body: String,
    },

    /// Response body could not be decoded
    #[error("Failed to parse model provider response: {0}")]
    InvalidResponse(String),

    /// Provider refused the prompt
    #[error("Model provider blocked the prompt: {0}")]
    Blocked(String),

    /// Response had no candidates
    #[error("Model provider response contains no candidates")]
    NoCandidates,

    /// First candidate carried no text
    #[error("Model provider response text is empty")]
    EmptyText,
}

/// How the bytes of a binary part are carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartData {
    /// Raw file bytes
    Raw(Bytes),
    /// Base64 text wrapped as an inline part
    Base64(String),
}

/// One uploaded file's content, tagged with its MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPart {
    /// MIME type reported by the upload
    pub mime_type: String,
    /// Payload in its route-specific encoding
    pub data: PartData,
}

impl BinaryPart {
    /// Part carrying the file bytes as-is
    pub fn raw(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: PartData::Raw(data.into()),
        }
    }

    /// Part carrying the file as base64 under an inline wrapper
    pub fn inline_base64(mime_type: impl Into<String>, data: &[u8]) -> Self {
        use base64::Engine;

        Self {
            mime_type: mime_type.into(),
            data: PartData::Base64(base64::engine::general_purpose::STANDARD.encode(data)),
        }
    }
}

/// A single element of the ordered content list sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Prompt or instruction text
    Text(String),
    /// Binary attachment
    Binary(BinaryPart),
}

/// Ordered content handed to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    parts: Vec<ContentPart>,
}

impl GenerationRequest {
    /// Build a request, rejecting one with no non-blank text and no binary part
    pub fn new(parts: Vec<ContentPart>) -> Result<Self, GenerationError> {
        let has_content = parts.iter().any(|part| match part {
            ContentPart::Text(text) => !text.trim().is_empty(),
            ContentPart::Binary(_) => true,
        });
        if !has_content {
            return Err(GenerationError::EmptyRequest);
        }
        Ok(Self { parts })
    }

    /// Single text part
    pub fn text(prompt: impl Into<String>) -> Result<Self, GenerationError> {
        Self::new(vec![ContentPart::Text(prompt.into())])
    }

    /// Instruction text followed by one attachment
    pub fn with_attachment(prompt: impl Into<String>, part: BinaryPart) -> Result<Self, GenerationError> {
        Self::new(vec![ContentPart::Text(prompt.into()), ContentPart::Binary(part)])
    }

    /// Parts in the order they will be sent
    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    /// Consume the request, yielding its parts
    pub fn into_parts(self) -> Vec<ContentPart> {
        self.parts
    }
}

/// Text produced by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Generated text
    pub text: String,
}

/// A hosted model that turns ordered content parts into text
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one generation call
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_blank_text_only() {
        let result = GenerationRequest::text("   ");
        assert!(matches!(result, Err(GenerationError::EmptyRequest)));

        let result = GenerationRequest::new(vec![]);
        assert!(matches!(result, Err(GenerationError::EmptyRequest)));
    }

    #[test]
    fn test_request_accepts_attachment_without_text() {
        let part = BinaryPart::raw("image/png", vec![1u8, 2, 3]);
        let request = GenerationRequest::new(vec![ContentPart::Binary(part)]);
        assert!(request.is_ok());
    }

    #[test]
    fn test_with_attachment_keeps_order() {
        let part = BinaryPart::raw("image/png", vec![9u8]);
        let request = GenerationRequest::with_attachment("Describe the image", part.clone())
            .expect("valid request");

        assert_eq!(
            request.parts(),
            &[
                ContentPart::Text("Describe the image".to_string()),
                ContentPart::Binary(part),
            ]
        );
    }

    #[test]
    fn test_inline_base64_encodes_payload() {
        let part = BinaryPart::inline_base64("application/pdf", b"ABC");
        assert_eq!(part.mime_type, "application/pdf");
        assert_eq!(part.data, PartData::Base64("QUJD".to_string()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GenerationError::MissingApiKey.to_string(), "API key is empty");
        let err = GenerationError::RateLimited {
            status: 429,
            body: "quota".to_string(),
        };
        assert!(err.to_string().contains("429"));
    }
}
