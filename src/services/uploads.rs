//! Temporary upload storage
//!
//! Multipart files are written to a per-request file under the upload
//! directory and handed out as an [`UploadedFile`]. Whoever holds the
//! handle owns the file on disk: `cleanup()` removes it on the normal
//! path and `Drop` removes it on every other exit path.

use crate::error::AppError;
use axum::extract::multipart::Field;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// MIME type used when the client sends none
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Directory where incoming multipart files are saved
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir` (created lazily)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Upload directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure the upload directory exists
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to create upload directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    /// Stream one multipart file field to a uniquely named file
    ///
    /// The returned handle already owns the path while the write is in
    /// progress, so a failed or aborted write leaves nothing behind.
    pub async fn save(&self, mut field: Field<'_>) -> Result<UploadedFile, AppError> {
        self.ensure_dir().await?;

        let original_name = field.file_name().map(|s| s.to_string());
        let mime_type = field
            .content_type()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let unique_name = match original_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
        {
            Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let mut upload = UploadedFile {
            path: Some(self.dir.join(&unique_name)),
            mime_type,
            original_name,
            size: 0,
        };

        let mut file = fs::File::create(upload.path()).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to create temp file: {}", e))
        })?;

        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to write upload: {}", e))
            })?;
            upload.size += chunk.len() as u64;
        }

        file.sync_all()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sync upload: {}", e)))?;

        info!(
            path = %upload.path().display(),
            mime_type = %upload.mime_type,
            size = upload.size,
            "Saved uploaded file"
        );

        Ok(upload)
    }
}

/// A multipart file saved to disk for the duration of one request
#[derive(Debug)]
pub struct UploadedFile {
    /// `None` once the file has been removed
    path: Option<PathBuf>,
    mime_type: String,
    original_name: Option<String>,
    size: u64,
}

impl UploadedFile {
    /// Location of the temporary file
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// MIME type reported by the client
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File name supplied by the client, if any
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Bytes written to disk
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the whole file into memory
    pub async fn read_all(&self) -> Result<Vec<u8>, AppError> {
        fs::read(self.path()).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to read uploaded file {}: {}",
                self.path().display(),
                e
            ))
        })
    }

    /// Delete the temporary file
    ///
    /// Failures are logged and swallowed.
    pub async fn cleanup(mut self) {
        if let Some(path) = self.path.take() {
            match fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed temporary upload"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove temporary upload"),
            }
        }
    }
}

// Last-resort path for exits that skip `cleanup()`. The unlink stays
// synchronous so the file is gone before the response is sent; a spawned
// removal could still be pending when the client observes the result.
impl Drop for UploadedFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to remove temporary upload");
                }
            }
        }
    }
}
