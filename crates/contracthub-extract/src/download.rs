//! Download a remote file into a self-deleting temporary file.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;

/// A file under the extraction temp directory that is removed on drop.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Reserve a fresh, randomly named path inside `dir`.
    pub fn new_in(dir: &Path, extension: &str) -> Self {
        Self {
            path: dir.join(format!("contract-{}.{extension}", Uuid::new_v4())),
        }
    }

    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove temporary file");
            }
        }
    }
}

/// Stream `url` into a new temporary file, enforcing `max_bytes`.
pub async fn download_to_temp(
    client: &Client,
    url: &str,
    dir: &Path,
    extension: &str,
    max_bytes: u64,
) -> AppResult<TempFile> {
    let response = client.get(url).send().await.map_err(|e| {
        AppError::with_source(ErrorKind::Extraction, "Failed to download file", e)
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(AppError::extraction(format!(
            "Failed to download file: {}",
            status.as_u16()
        )));
    }
    if response.content_length().is_some_and(|len| len > max_bytes) {
        return Err(too_large(max_bytes));
    }

    fs::create_dir_all(dir).await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to create temp directory", e)
    })?;
    let temp = TempFile::new_in(dir, extension);
    let mut file = fs::File::create(temp.path()).await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to create temp file", e)
    })?;

    let mut total = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            AppError::with_source(ErrorKind::Extraction, "Download interrupted", e)
        })?;
        total += chunk.len() as u64;
        if total > max_bytes {
            return Err(too_large(max_bytes));
        }
        file.write_all(&chunk).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to write temp file", e)
        })?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush temp file", e))?;

    debug!(path = %temp.path().display(), bytes = total, "Downloaded file");
    Ok(temp)
}

fn too_large(max_bytes: u64) -> AppError {
    AppError::extraction(format!("File exceeds the {max_bytes}-byte download limit"))
}
