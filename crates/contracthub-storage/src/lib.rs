//! # contracthub-storage
//!
//! Object store providers behind [`contracthub_core::traits::ObjectStore`]:
//! a local filesystem store that serves signed URLs through the API, and an
//! S3-compatible store (feature `s3`) that issues presigned URLs.

pub mod factory;
pub mod keys;
pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

pub use factory::{ObjectStores, build_object_store};
pub use keys::{bucket_key, upload_key, validate_key};
pub use local::LocalObjectStore;
#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;
