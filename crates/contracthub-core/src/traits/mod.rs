//! Seam traits implemented by the infrastructure crates.
//!
//! Services depend only on these traits so that tests can swap in
//! in-process fakes.

pub mod completion;
pub mod extractor;
pub mod identity;
pub mod storage;

pub use completion::{CompletionProvider, CompletionRequest, ResponseFormat};
pub use extractor::{ExtractedText, FileFormat, TextExtractor};
pub use identity::IdentityVerifier;
pub use storage::ObjectStore;
