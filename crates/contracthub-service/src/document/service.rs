//! Document CRUD and processing entry point.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;
use contracthub_core::traits::ObjectStore;
use contracthub_database::DocumentRepository;
use contracthub_entity::document::{Document, DocumentFilter, NewDocument, UpdateDocument};

use super::pipeline::DocumentPipeline;
use crate::context::RequestContext;
use crate::storage::service::delete_owned_file;
use crate::validate::FieldErrors;

/// Manages uploaded documents.
#[derive(Debug, Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentRepository>,
    store: Arc<dyn ObjectStore>,
    pipeline: DocumentPipeline,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        store: Arc<dyn ObjectStore>,
        pipeline: DocumentPipeline,
    ) -> Self {
        Self {
            documents,
            store,
            pipeline,
        }
    }

    /// Records a document uploaded by the caller in `pending` status.
    pub async fn create(&self, ctx: &RequestContext, new: NewDocument) -> AppResult<Document> {
        let mut errors = FieldErrors::new();
        errors.required("title", &new.title);
        errors.required("fileUrl", &new.file_url);
        errors.required("fileType", &new.file_type);
        errors.non_negative("fileSize", Some(new.file_size));
        errors.finish()?;

        let created = self.documents.create(&ctx.user_id, new).await?;
        info!(document_id = %created.id, uploader = %ctx.user_id, "Document created");
        Ok(created)
    }

    /// Lists the caller's documents matching `filter`, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<Document>> {
        self.documents.find_by_uploader(&ctx.user_id, filter).await
    }

    /// Gets a document visible to the caller.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Document> {
        self.documents
            .find_by_id(id)
            .await?
            .filter(|d| ctx.can_access(&d.uploaded_by))
            .ok_or_else(|| not_found(id))
    }

    /// Updates title, description, or tags.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: UpdateDocument,
    ) -> AppResult<Document> {
        let mut errors = FieldErrors::new();
        errors.not_blank("title", update.title.as_deref());
        errors.finish()?;

        let current = self.get(ctx, id).await?;
        if update == UpdateDocument::default() {
            return Ok(current);
        }
        self.documents.update(id, update).await
    }

    /// Deletes a document and then, best effort, its file.
    pub async fn remove(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let document = self.get(ctx, id).await?;

        if !self.documents.delete(id).await? {
            return Err(not_found(id));
        }
        info!(document_id = %id, "Document deleted");

        if let Err(e) = delete_owned_file(self.store.as_ref(), ctx, &document.file_url).await {
            warn!(
                document_id = %id,
                file_url = %document.file_url,
                error = %e,
                "Document file left in place"
            );
        }
        Ok(())
    }

    /// Runs the processing pipeline for a document visible to the caller.
    pub async fn process(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Document> {
        self.get(ctx, id).await?;
        self.pipeline.process(id).await
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Document {id} not found"))
}
