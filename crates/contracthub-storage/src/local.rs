//! Local filesystem object store.
//!
//! Files are written under a root directory and addressed by URLs of the
//! form `{public_base_url}/api/storage/files/{key}`. Download URLs carry a
//! short-lived HS256 token in the `token` query parameter, which the API
//! checks with [`LocalObjectStore::verify_download`] before serving bytes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use contracthub_core::config::LocalStorageConfig;
use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_core::traits::ObjectStore;

use crate::keys::{bucket_key, validate_key};

/// Path, relative to the public base URL, under which files are served.
pub const FILES_ROUTE: &str = "/api/storage/files/";

/// Claims embedded in a download token.
#[derive(Debug, Serialize, Deserialize)]
struct DownloadClaims {
    /// Object key the token grants access to.
    sub: String,
    /// Expiration timestamp (seconds since epoch).
    exp: i64,
}

/// Object store backed by the local filesystem.
#[derive(Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    files_prefix: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl std::fmt::Debug for LocalObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalObjectStore")
            .field("root", &self.root)
            .field("files_prefix", &self.files_prefix)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl LocalObjectStore {
    /// Create a store rooted at `config.root_path`, creating the directory
    /// if needed.
    pub async fn new(config: &LocalStorageConfig, ttl_seconds: u64) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            root,
            files_prefix: format!(
                "{}{FILES_ROUTE}",
                config.public_base_url.trim_end_matches('/')
            ),
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            validation,
            ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
        })
    }

    /// The permanent file URL for a key.
    pub fn file_url(&self, key: &str) -> String {
        format!("{}{key}", self.files_prefix)
    }

    /// Check that `token` was issued by this store for `key` and has not
    /// expired.
    pub fn verify_download(&self, key: &str, token: &str) -> AppResult<()> {
        let data = decode::<DownloadClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Download link has expired")
                }
                _ => AppError::unauthorized("Invalid download token"),
            })?;

        if data.claims.sub != key.trim_start_matches('/') {
            return Err(AppError::unauthorized("Invalid download token"));
        }
        Ok(())
    }

    fn sign(&self, key: &str) -> AppResult<String> {
        let claims = DownloadClaims {
            sub: key.to_string(),
            exp: Utc::now().timestamp().saturating_add(self.ttl_seconds),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to sign download URL", e))
    }

    /// Resolve a key to an absolute path within the root.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        Ok(self.root.join(validate_key(key)?))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn owned_key(&self, file_url: &str) -> AppResult<String> {
        self.key_for_url(file_url).ok_or_else(|| {
            AppError::validation(format!("URL is not managed by this store: {file_url}"))
        })
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    fn key_for_url(&self, file_url: &str) -> Option<String> {
        if let Some(rest) = file_url.strip_prefix(&self.files_prefix) {
            let key = rest.split(['?', '#']).next().unwrap_or_default();
            return (!key.is_empty()).then(|| key.to_string());
        }
        bucket_key(file_url)
    }

    async fn upload(&self, key: &str, data: Bytes, _content_type: Option<&str>) -> AppResult<String> {
        let key = validate_key(key)?;
        let full_path = self.resolve(key)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write file: {key}"), e)
        })?;

        debug!(key, bytes = data.len(), "Wrote file");
        Ok(self.file_url(key))
    }

    async fn download_url(&self, file_url: &str) -> AppResult<String> {
        match self.key_for_url(file_url) {
            Some(key) => {
                let key = validate_key(&key)?;
                Ok(format!("{}?token={}", self.file_url(key), self.sign(key)?))
            }
            None => Ok(file_url.to_string()),
        }
    }

    async fn delete(&self, file_url: &str) -> AppResult<()> {
        let key = self.owned_key(file_url)?;
        let full_path = self.resolve(&key)?;
        fs::remove_file(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {key}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to delete file: {key}"), e)
            }
        })?;
        debug!(key = %key, "Deleted file");
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(key)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {key}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to read file: {key}"), e)
            }
        })?;
        Ok(Bytes::from(data))
    }
}
