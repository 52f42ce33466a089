//! Upload routes
//!
//! Each route saves one multipart file to disk, reads it back, attaches it
//! to the model call after an instruction, and removes the file again
//! whatever the outcome. Images travel as raw bytes; documents and audio
//! are base64-encoded into an inline part.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, warn};

use super::{GatewayState, OutputResponse};
use crate::error::AppError;
use crate::services::generation::{BinaryPart, GenerationRequest};
use crate::services::uploads::{UploadStore, UploadedFile};

/// Prompt used when the image route receives none
pub const DEFAULT_IMAGE_PROMPT: &str = "Describe the image";

/// Fixed instruction for the document route
pub const DOCUMENT_INSTRUCTION: &str = "Analyze this document:";

/// Fixed instruction for the audio route
pub const AUDIO_INSTRUCTION: &str = "Transcribe or analyze the following audio:";

/// Fields collected from one multipart body
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    prompt: Option<String>,
}

/// Read the multipart body, saving the file found under `file_field`
///
/// On error any file already saved is dropped, which removes it from disk.
async fn read_upload_form(
    uploads: &UploadStore,
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == file_field {
            if form.file.is_some() {
                return Err(AppError::InvalidRequest(format!(
                    "Only one file may be uploaded in field '{}'",
                    file_field
                )));
            }
            form.file = Some(uploads.save(field).await?);
        } else if field_name == "prompt" {
            form.prompt = Some(field.text().await?);
        } else {
            warn!(field = %field_name, "Ignoring unknown multipart field");
        }
    }

    Ok(form)
}

/// Read the upload, build its part and call the model
async fn generate_with_upload(
    state: &GatewayState,
    upload: &UploadedFile,
    prompt: String,
    to_part: fn(&str, Vec<u8>) -> BinaryPart,
) -> Result<Json<OutputResponse>, AppError> {
    let data = upload.read_all().await?;
    let part = to_part(upload.mime_type(), data);
    let request = GenerationRequest::with_attachment(prompt, part)?;
    let result = state.model.generate(request).await?;

    Ok(Json(OutputResponse {
        output: result.text,
    }))
}

/// Run one upload route: collect the form, generate, then clean up
async fn handle_upload(
    state: GatewayState,
    mut multipart: Multipart,
    file_field: &str,
    prompt_for: fn(Option<String>) -> String,
    to_part: fn(&str, Vec<u8>) -> BinaryPart,
) -> Result<Json<OutputResponse>, AppError> {
    let form = read_upload_form(&state.uploads, &mut multipart, file_field).await?;
    let upload = form
        .file
        .ok_or_else(|| AppError::UploadMissing(file_field.to_string()))?;
    let prompt = prompt_for(form.prompt);

    info!(
        field = %file_field,
        mime_type = %upload.mime_type(),
        size = upload.size(),
        original_name = ?upload.original_name(),
        "Processing upload"
    );

    let result = generate_with_upload(&state, &upload, prompt, to_part).await;
    upload.cleanup().await;
    result
}

/// POST /generate-from-image - Describe an uploaded image
///
/// Multipart fields: `image` (file), optional `prompt` (text).
pub async fn generate_from_image(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<OutputResponse>, AppError> {
    handle_upload(
        state,
        multipart,
        "image",
        |prompt| {
            prompt
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string())
        },
        |mime_type, data| BinaryPart::raw(mime_type, data),
    )
    .await
}

/// POST /generate-from-document - Analyze an uploaded document
///
/// Multipart field: `document` (file). Any `prompt` field is ignored.
pub async fn generate_from_document(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<OutputResponse>, AppError> {
    handle_upload(
        state,
        multipart,
        "document",
        |_| DOCUMENT_INSTRUCTION.to_string(),
        |mime_type, data| BinaryPart::inline_base64(mime_type, &data),
    )
    .await
}

/// POST /generate-from-audio - Transcribe or analyze uploaded audio
///
/// Multipart field: `audio` (file). Any `prompt` field is ignored.
pub async fn generate_from_audio(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<OutputResponse>, AppError> {
    handle_upload(
        state,
        multipart,
        "audio",
        |_| AUDIO_INSTRUCTION.to_string(),
        |mime_type, data| BinaryPart::inline_base64(mime_type, &data),
    )
    .await
}
