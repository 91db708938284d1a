//! PostgreSQL document repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_entity::document::{
    Document, DocumentFilter, DocumentStatus, NewDocument, UpdateDocument,
};

use super::DocumentRepository;

/// Repository for document persistence.
#[derive(Debug, Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn transition(
        &self,
        id: Uuid,
        to: DocumentStatus,
        outputs: Option<(&str, &str)>,
    ) -> AppResult<Option<Document>> {
        let (text, summary) = outputs.unzip();
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET status = $2, \
             extracted_text = COALESCE($3, extracted_text), \
             summary = COALESCE($4, summary), \
             updated_at = NOW() \
             WHERE id = $1 AND status = 'processing' RETURNING *",
        )
        .bind(id)
        .bind(to)
        .bind(text)
        .bind(summary)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to mark document {to}"),
                e,
            )
        })
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn create(&self, uploaded_by: &str, new: NewDocument) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, title, description, file_url, file_type, file_size, \
             uploaded_by, tags) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.file_url)
        .bind(&new.file_type)
        .bind(new.file_size)
        .bind(uploaded_by)
        .bind(&new.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create document", e))
    }

    async fn find_by_uploader(
        &self,
        uploaded_by: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<Document>> {
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE uploaded_by = $1 \
             AND ($2::document_status IS NULL OR status = $2) \
             AND ($3::text IS NULL OR $3 = ANY(tags)) \
             AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4) \
             ORDER BY uploaded_at DESC",
        )
        .bind(uploaded_by)
        .bind(filter.status)
        .bind(&filter.tag)
        .bind(search)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    async fn update(&self, id: Uuid, update: UpdateDocument) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             tags = COALESCE($4, tags), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update document", e))?
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    async fn mark_processing(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET status = 'processing', updated_at = NOW() \
             WHERE id = $1 AND status <> 'processing' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark document processing", e)
        })
    }

    async fn mark_failed(&self, id: Uuid) -> AppResult<Option<Document>> {
        self.transition(id, DocumentStatus::Failed, None).await
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        extracted_text: &str,
        summary: &str,
    ) -> AppResult<Option<Document>> {
        self.transition(id, DocumentStatus::Completed, Some((extracted_text, summary)))
            .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
