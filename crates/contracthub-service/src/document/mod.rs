//! Document use cases and the processing pipeline.

pub mod pipeline;
pub mod service;

pub use pipeline::{DocumentPipeline, fallback_summary};
pub use service::DocumentService;
