//! Storage service: uploads, download URLs, deletion.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;
use contracthub_core::traits::ObjectStore;
use contracthub_storage::{upload_key, validate_key};

use crate::context::RequestContext;

const UPLOADS_PREFIX: &str = "uploads/";

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// URL to store on a contract or document.
    pub file_url: String,
    /// Client-supplied file name.
    pub original_name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type from the upload, or guessed from the name.
    pub mime_type: String,
}

/// Thin policy layer over the configured [`ObjectStore`].
#[derive(Debug, Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStore>,
    max_upload_size_bytes: u64,
}

impl StorageService {
    /// Creates a new storage service.
    pub fn new(store: Arc<dyn ObjectStore>, max_upload_size_bytes: u64) -> Self {
        Self {
            store,
            max_upload_size_bytes,
        }
    }

    /// Stores an uploaded file.
    ///
    /// The object key is `path` when given, otherwise a per-user key derived
    /// from the file name and the current time.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
        path: Option<&str>,
    ) -> AppResult<UploadedFile> {
        if file_name.trim().is_empty() {
            return Err(AppError::validation("No file uploaded"));
        }
        let size = data.len() as u64;
        if size > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File too large: {size} bytes exceeds the {} byte limit",
                self.max_upload_size_bytes
            )));
        }

        let key = match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => {
                let key = validate_key(path)?;
                ensure_key_access(ctx, key)?;
                key.to_string()
            }
            None => upload_key(&ctx.user_id, file_name, Utc::now()),
        };
        let mime_type = content_type
            .filter(|c| !c.is_empty() && *c != "application/octet-stream")
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(file_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        let file_url = self.store.upload(&key, data, Some(&mime_type)).await?;
        info!(key = %key, size, user = %ctx.user_id, "File uploaded");

        Ok(UploadedFile {
            file_url,
            original_name: file_name.to_string(),
            size,
            mime_type,
        })
    }

    /// Returns a time-limited URL for reading `file_url`.
    pub async fn download_url(&self, file_url: &str) -> AppResult<String> {
        if file_url.trim().is_empty() {
            return Err(AppError::validation("fileUrl is required"));
        }
        self.store.download_url(file_url).await
    }

    /// Deletes the object behind `file_url`.
    ///
    /// Objects under another user's `uploads/{user_id}/` prefix are reported
    /// as not found unless the caller is an administrator.
    pub async fn delete(&self, ctx: &RequestContext, file_url: &str) -> AppResult<()> {
        if file_url.trim().is_empty() {
            return Err(AppError::validation("fileUrl is required"));
        }
        delete_owned_file(self.store.as_ref(), ctx, file_url).await?;
        info!(file_url = %file_url, user = %ctx.user_id, "File deleted");
        Ok(())
    }
}

/// Fails with not-found when `key` lies under another user's
/// `uploads/{user_id}/` prefix and the caller is not an administrator.
pub(crate) fn ensure_key_access(ctx: &RequestContext, key: &str) -> AppResult<()> {
    let owner = key
        .strip_prefix(UPLOADS_PREFIX)
        .and_then(|rest| rest.split('/').next());
    match owner {
        Some(owner) if !ctx.can_access(owner) => {
            Err(AppError::not_found(format!("File not found: {key}")))
        }
        _ => Ok(()),
    }
}

/// Deletes the object behind `file_url` after checking the caller may
/// touch its key. URLs the store does not own are left to the store.
pub(crate) async fn delete_owned_file(
    store: &dyn ObjectStore,
    ctx: &RequestContext,
    file_url: &str,
) -> AppResult<()> {
    if let Some(key) = store.key_for_url(file_url) {
        ensure_key_access(ctx, &key)?;
    }
    store.delete(file_url).await
}
