//! # contracthub-extract
//!
//! Turns a contract file URL into clean plain text: detect the format from
//! the URL, download to a temporary file, parse PDF or DOCX, and normalize
//! whitespace.

pub mod clean;
pub mod docx;
pub mod download;
pub mod extractor;
pub mod format;
pub mod pdf;

pub use clean::clean_text;
pub use extractor::HttpTextExtractor;
pub use format::{declared_format, detect_format};
