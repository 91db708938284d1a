//! # contracthub-service
//!
//! Business logic service layer for ContractHub. Services orchestrate the
//! repositories, the object store, the text extractor and the summarizer
//! to implement application use cases.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod context;
pub mod contract;
pub mod document;
pub mod storage;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use contract::ContractService;
pub use document::{DocumentPipeline, DocumentService, fallback_summary};
pub use storage::{StorageService, UploadedFile};
