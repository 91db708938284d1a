//! File upload and signed-download orchestration.

pub mod service;

pub use service::{StorageService, UploadedFile};
