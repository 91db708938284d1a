//! Construct the configured object store.

use std::sync::Arc;

use tracing::info;

use contracthub_core::config::{StorageConfig, StorageProvider};
use contracthub_core::result::AppResult;
use contracthub_core::traits::ObjectStore;

use crate::local::LocalObjectStore;

/// The configured store, plus a typed handle when it is the local store so
/// the API can serve its signed download URLs.
#[derive(Debug, Clone)]
pub struct ObjectStores {
    /// Store used by the services.
    pub store: Arc<dyn ObjectStore>,
    /// Same store when `provider = "local"`.
    pub local: Option<Arc<LocalObjectStore>>,
}

/// Build the object store selected by `storage.provider`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<ObjectStores> {
    match config.provider {
        StorageProvider::Local => {
            info!(root = %config.local.root_path, "Using local object store");
            let local = Arc::new(
                LocalObjectStore::new(&config.local, config.signed_url_ttl_seconds).await?,
            );
            Ok(ObjectStores {
                store: local.clone(),
                local: Some(local),
            })
        }
        #[cfg(feature = "s3")]
        StorageProvider::S3 => {
            info!(bucket = %config.s3.bucket, "Using S3 object store");
            let store =
                crate::s3::S3ObjectStore::new(&config.s3, config.signed_url_ttl_seconds).await?;
            Ok(ObjectStores {
                store: Arc::new(store),
                local: None,
            })
        }
        #[cfg(not(feature = "s3"))]
        StorageProvider::S3 => Err(contracthub_core::AppError::configuration(
            "S3 storage requires the `s3` feature",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builds_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorageConfig::default();
        config.local.root_path = dir.path().to_string_lossy().into_owned();

        let stores = build_object_store(&config).await.unwrap();
        assert_eq!(stores.store.provider_type(), "local");
        assert!(stores.local.is_some());
    }
}
