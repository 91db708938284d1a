//! Object store trait for pluggable file persistence backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for object storage backends.
///
/// Objects are addressed by a key (a relative path such as
/// `uploads/u1/1700000000000-msa.pdf`). Callers hold on to the file URL
/// returned by [`ObjectStore::upload`]; the other operations accept that
/// URL and resolve it back to a key.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Resolve a file URL produced by this store (or a `gs://` / `s3://`
    /// URL) to an object key. Returns `None` for URLs the store does not own.
    fn key_for_url(&self, file_url: &str) -> Option<String>;

    /// Store bytes under `key` and return the file URL.
    async fn upload(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<String>;

    /// Issue a time-limited download URL for `file_url`.
    ///
    /// URLs the store does not own are returned unchanged.
    async fn download_url(&self, file_url: &str) -> AppResult<String>;

    /// Delete the object behind `file_url`.
    async fn delete(&self, file_url: &str) -> AppResult<()>;

    /// Read an object into memory by key.
    async fn read(&self, key: &str) -> AppResult<Bytes>;
}
