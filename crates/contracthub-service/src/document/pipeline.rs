//! Document processing pipeline: extract, summarize, persist.
//!
//! Status moves `pending → processing → completed | failed`. Claiming a
//! document for processing is a single conditional write, so only one
//! run can be in flight per document. A failed run leaves the previous
//! outputs untouched; calling `process` again starts over.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;
use contracthub_core::traits::{ObjectStore, TextExtractor};
use contracthub_database::DocumentRepository;
use contracthub_entity::document::Document;

/// Characters kept by [`fallback_summary`].
pub const FALLBACK_SUMMARY_CHARS: usize = 200;

/// The first 200 characters of `text`, followed by `...` when longer.
pub fn fallback_summary(text: &str) -> String {
    match text.char_indices().nth(FALLBACK_SUMMARY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Runs extraction for documents and records the outcome.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    documents: Arc<dyn DocumentRepository>,
    store: Arc<dyn ObjectStore>,
    extractor: Arc<dyn TextExtractor>,
}

impl DocumentPipeline {
    /// Creates a new pipeline.
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        store: Arc<dyn ObjectStore>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            documents,
            store,
            extractor,
        }
    }

    /// Process one document synchronously and return the final record.
    ///
    /// Fails with not-found for an unknown id and with a conflict when the
    /// document is already processing. Extraction errors, and errors while
    /// storing the outputs, mark the document failed and are returned to
    /// the caller.
    pub async fn process(&self, id: Uuid) -> AppResult<Document> {
        self.documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;

        let document = self.documents.mark_processing(id).await?.ok_or_else(|| {
            AppError::conflict(format!("Document {id} is already being processed"))
        })?;
        info!(document_id = %id, "Document processing started");

        let outcome = match self.extract(&document).await {
            Ok(text) => self.complete(id, &text).await,
            Err(e) => {
                warn!(document_id = %id, error = %e, "Document extraction failed");
                Err(e)
            }
        };

        if outcome.is_err() {
            self.mark_failed(id).await;
        }
        outcome
    }

    async fn complete(&self, id: Uuid, text: &str) -> AppResult<Document> {
        let summary = fallback_summary(text);
        let completed = self
            .documents
            .mark_completed(id, text, &summary)
            .await?
            .ok_or_else(|| AppError::conflict(format!("Document {id} changed during processing")))?;

        info!(document_id = %id, chars = text.len(), "Document processing completed");
        Ok(completed)
    }

    async fn mark_failed(&self, id: Uuid) {
        match self.documents.mark_failed(id).await {
            Ok(Some(_)) => {}
            Ok(None) => warn!(document_id = %id, "Document left processing state early"),
            Err(e) => error!(document_id = %id, error = %e, "Failed to mark document failed"),
        }
    }

    async fn extract(&self, document: &Document) -> AppResult<String> {
        let url = self.store.download_url(&document.file_url).await?;
        let extracted = self
            .extractor
            .extract(&url, Some(&document.file_type))
            .await?;
        Ok(extracted.text)
    }
}
