//! Text extractor trait.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Concrete document format recognised by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word processing document.
    Docx,
    /// Legacy binary Word document. Recognised, not extractable.
    Doc,
}

impl FileFormat {
    /// Return the format as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaned text produced by an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    /// Normalised plain text.
    pub text: String,
    /// The format the text was extracted from.
    pub file_type: FileFormat,
}

impl ExtractedText {
    /// Number of whitespace-separated words.
    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Turns a remote document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync + std::fmt::Debug + 'static {
    /// Download `file_url` and extract its text.
    ///
    /// `declared_type` is the MIME/type string stored with the record; it
    /// is advisory only.
    async fn extract(&self, file_url: &str, declared_type: Option<&str>)
    -> AppResult<ExtractedText>;
}
