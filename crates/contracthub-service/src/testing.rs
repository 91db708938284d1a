//! Test doubles for the extractor, completion, and repository seams.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use contracthub_ai::Summarizer;
use contracthub_core::config::{AiConfig, LocalStorageConfig};
use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_core::traits::{
    CompletionProvider, CompletionRequest, ExtractedText, FileFormat, TextExtractor,
};
use contracthub_core::types::Identity;
use contracthub_database::{DocumentRepository, MemoryDocumentRepository};
use contracthub_entity::document::{Document, DocumentFilter, NewDocument, UpdateDocument};
use contracthub_storage::LocalObjectStore;

use crate::context::RequestContext;

#[derive(Debug)]
pub struct StubExtractor {
    outcome: Result<String, AppError>,
    pub calls: Mutex<Vec<String>>,
}

impl StubExtractor {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: AppError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, file_url: &str, _declared: Option<&str>) -> AppResult<ExtractedText> {
        self.calls.lock().unwrap().push(file_url.to_string());
        self.outcome.clone().map(|text| ExtractedText {
            text,
            file_type: FileFormat::Pdf,
        })
    }
}

#[derive(Debug)]
pub struct CannedCompletion(pub Option<&'static str>);

#[async_trait]
impl CompletionProvider for CannedCompletion {
    fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    async fn complete(&self, _request: &CompletionRequest) -> AppResult<Option<String>> {
        Ok(self.0.map(str::to_string))
    }
}

pub fn summarizer(reply: Option<&'static str>) -> Arc<Summarizer> {
    Arc::new(Summarizer::new(
        Arc::new(CannedCompletion(reply)),
        &AiConfig::default(),
    ))
}

pub async fn local_store(dir: &tempfile::TempDir) -> Arc<LocalObjectStore> {
    let config = LocalStorageConfig {
        root_path: dir.path().to_string_lossy().into_owned(),
        public_base_url: "http://api.test".into(),
        signing_secret: "service-test-secret".into(),
    };
    Arc::new(LocalObjectStore::new(&config, 300).await.unwrap())
}

pub fn ctx(user: &str) -> RequestContext {
    RequestContext::new(Identity::new(user, None, None))
}

pub fn admin() -> RequestContext {
    RequestContext::new(Identity::new("admin-1", None, Some("admin".into())))
}

/// In-memory documents with switchable write failures.
#[derive(Debug, Default)]
pub struct FaultyDocuments {
    inner: MemoryDocumentRepository,
    pub fail_next_completion: AtomicBool,
    pub fail_delete: AtomicBool,
}

fn injected(what: &str) -> AppError {
    AppError::new(ErrorKind::Database, format!("injected {what} failure"))
}

#[async_trait]
impl DocumentRepository for FaultyDocuments {
    async fn create(&self, uploaded_by: &str, document: NewDocument) -> AppResult<Document> {
        self.inner.create(uploaded_by, document).await
    }

    async fn find_by_uploader(
        &self,
        uploaded_by: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<Document>> {
        self.inner.find_by_uploader(uploaded_by, filter).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        self.inner.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, update: UpdateDocument) -> AppResult<Document> {
        self.inner.update(id, update).await
    }

    async fn mark_processing(&self, id: Uuid) -> AppResult<Option<Document>> {
        self.inner.mark_processing(id).await
    }

    async fn mark_failed(&self, id: Uuid) -> AppResult<Option<Document>> {
        self.inner.mark_failed(id).await
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        extracted_text: &str,
        summary: &str,
    ) -> AppResult<Option<Document>> {
        if self.fail_next_completion.swap(false, Ordering::SeqCst) {
            return Err(injected("completion"));
        }
        self.inner.mark_completed(id, extracted_text, summary).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(injected("delete"));
        }
        self.inner.delete(id).await
    }
}
