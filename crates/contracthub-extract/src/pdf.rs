//! PDF text extraction.

use lopdf::Document;
use tracing::debug;

use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;

/// Extract the text of every page, in page order.
pub fn extract_pdf(data: &[u8]) -> AppResult<String> {
    let document = Document::load_mem(data)
        .map_err(|e| AppError::with_source(ErrorKind::Extraction, "Failed to parse PDF", e))?;

    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    debug!(pages = pages.len(), "Extracting PDF text");
    if pages.is_empty() {
        return Ok(String::new());
    }

    document
        .extract_text(&pages)
        .map_err(|e| AppError::with_source(ErrorKind::Extraction, "Failed to extract PDF text", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        let err = extract_pdf(b"this is not a pdf").unwrap_err();
        assert!(err.is(ErrorKind::Extraction));
    }
}
