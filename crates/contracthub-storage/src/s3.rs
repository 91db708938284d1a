//! S3-compatible object store (AWS S3, MinIO, GCS interoperability).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use contracthub_core::config::S3StorageConfig;
use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_core::traits::ObjectStore;

use crate::keys::{bucket_key, validate_key};

/// Object store backed by an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    /// `{endpoint}/{bucket}/` when a custom endpoint is configured.
    endpoint_prefix: Option<String>,
    signed_url_ttl: Duration,
}

impl S3ObjectStore {
    /// Build a client from configuration. Empty credentials fall back to the
    /// default AWS credential chain.
    pub async fn new(config: &S3StorageConfig, signed_url_ttl_seconds: u64) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 object store"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                &config.access_key,
                &config.secret_key,
                None,
                None,
                "contracthub",
            ));
        }
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(&config.endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        let endpoint_prefix = (!config.endpoint.is_empty()).then(|| {
            format!("{}/{}/", config.endpoint.trim_end_matches('/'), config.bucket)
        });

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            endpoint_prefix,
            signed_url_ttl: Duration::from_secs(signed_url_ttl_seconds),
        })
    }

    fn owned_key(&self, file_url: &str) -> AppResult<String> {
        self.key_for_url(file_url).ok_or_else(|| {
            AppError::validation(format!("URL is not managed by this store: {file_url}"))
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    fn key_for_url(&self, file_url: &str) -> Option<String> {
        if let Some(prefix) = &self.endpoint_prefix {
            if let Some(rest) = file_url.strip_prefix(prefix.as_str()) {
                let key = rest.split(['?', '#']).next().unwrap_or_default();
                return (!key.is_empty()).then(|| key.to_string());
            }
        }
        bucket_key(file_url)
    }

    async fn upload(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<String> {
        let key = validate_key(key)?;
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to upload object: {key}"), e)
            })?;

        debug!(key, bytes = size, "Uploaded object");
        Ok(format!("s3://{}/{key}", self.bucket))
    }

    async fn download_url(&self, file_url: &str) -> AppResult<String> {
        let Some(key) = self.key_for_url(file_url) else {
            return Ok(file_url.to_string());
        };

        let presigning = PresigningConfig::expires_in(self.signed_url_ttl).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid signed URL lifetime", e)
        })?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to presign object: {key}"), e)
            })?;
        Ok(request.uri().to_string())
    }

    async fn delete(&self, file_url: &str) -> AppResult<()> {
        let key = self.owned_key(file_url)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to delete object: {key}"), e)
            })?;
        debug!(key = %key, "Deleted object");
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<Bytes> {
        let key = validate_key(key)?;
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to read object: {key}"), e)
            })?;
        let data = output.body.collect().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to read object body: {key}"), e)
        })?;
        Ok(data.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> S3ObjectStore {
        let config = S3StorageConfig {
            endpoint: "http://minio.local:9000".into(),
            bucket: "contracts".into(),
            access_key: "minio".into(),
            secret_key: "minio-secret".into(),
            force_path_style: true,
            ..Default::default()
        };
        S3ObjectStore::new(&config, 3600).await.unwrap()
    }

    #[tokio::test]
    async fn test_key_for_url() {
        let store = store().await;
        assert_eq!(store.key_for_url("s3://contracts/a/b.pdf").as_deref(), Some("a/b.pdf"));
        assert_eq!(
            store.key_for_url("http://minio.local:9000/contracts/a/b.pdf?X-Amz-Expires=1").as_deref(),
            Some("a/b.pdf")
        );
        assert_eq!(store.key_for_url("https://elsewhere.example/x.pdf"), None);
    }

    #[tokio::test]
    async fn test_presigned_url_is_local_computation() {
        let store = store().await;
        let url = store.download_url("s3://contracts/a/b.pdf").await.unwrap();
        assert!(url.starts_with("http://minio.local:9000/contracts/a/b.pdf?"));
        assert!(url.contains("X-Amz-Expires=3600"));

        let foreign = "https://elsewhere.example/x.pdf";
        assert_eq!(store.download_url(foreign).await.unwrap(), foreign);
    }

    #[tokio::test]
    async fn test_missing_bucket_is_configuration_error() {
        let err = S3ObjectStore::new(&S3StorageConfig::default(), 60).await.unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
