//! Shared harness: the full router over in-memory repositories, a local
//! object store in a temporary directory, and stubbed extraction and
//! completion providers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use contracthub_ai::Summarizer;
use contracthub_api::{AppState, build_app};
use contracthub_auth::{JwtEncoder, JwtIdentityVerifier};
use contracthub_core::config::AppConfig;
use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;
use contracthub_core::traits::{
    CompletionProvider, CompletionRequest, ExtractedText, FileFormat, ObjectStore, TextExtractor,
};
use contracthub_database::{MemoryContractRepository, MemoryDocumentRepository};
use contracthub_service::{ContractService, DocumentPipeline, DocumentService, StorageService};
use contracthub_storage::LocalObjectStore;

pub const PUBLIC_BASE_URL: &str = "http://api.test";

#[derive(Debug)]
pub struct StubExtractor {
    outcome: Mutex<Result<String, AppError>>,
    pub calls: Mutex<Vec<String>>,
}

impl StubExtractor {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Ok(text.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: AppError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Err(err)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set(&self, outcome: Result<String, AppError>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, file_url: &str, _declared: Option<&str>) -> AppResult<ExtractedText> {
        self.calls.lock().unwrap().push(file_url.to_string());
        self.outcome.lock().unwrap().clone().map(|text| ExtractedText {
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

pub struct TestApp {
    pub router: Router,
    pub encoder: JwtEncoder,
    pub store: Arc<LocalObjectStore>,
    pub extractor: Arc<StubExtractor>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with(StubExtractor::ok("Hello world"), None).await
    }

    pub async fn with(extractor: Arc<StubExtractor>, completion: Option<&'static str>) -> Self {
        let dir = tempfile::tempdir().unwrap();

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "api-test-secret".into();
        config.storage.max_upload_size_bytes = 1024;
        config.storage.local.root_path = dir.path().to_string_lossy().into_owned();
        config.storage.local.public_base_url = PUBLIC_BASE_URL.into();
        config.storage.local.signing_secret = "api-test-files".into();

        let store = Arc::new(
            LocalObjectStore::new(&config.storage.local, config.storage.signed_url_ttl_seconds)
                .await
                .unwrap(),
        );
        let object_store: Arc<dyn ObjectStore> = store.clone();

        let summarizer = Arc::new(Summarizer::new(
            Arc::new(CannedCompletion(completion)),
            &config.ai,
        ));
        let documents = Arc::new(MemoryDocumentRepository::new());
        let pipeline =
            DocumentPipeline::new(documents.clone(), object_store.clone(), extractor.clone());

        let state = AppState {
            verifier: Arc::new(JwtIdentityVerifier::new(&config.auth).unwrap()),
            contract_service: Arc::new(ContractService::new(
                Arc::new(MemoryContractRepository::new()),
                object_store.clone(),
                extractor.clone(),
                summarizer,
            )),
            document_service: Arc::new(DocumentService::new(
                documents,
                object_store.clone(),
                pipeline,
            )),
            storage_service: Arc::new(StorageService::new(
                object_store,
                config.storage.max_upload_size_bytes,
            )),
            local_files: Some(store.clone()),
            started_at: Instant::now(),
            config: Arc::new(config.clone()),
        };

        Self {
            router: build_app(state),
            encoder: JwtEncoder::new(&config.auth),
            store,
            extractor,
            _dir: dir,
        }
    }

    pub fn token(&self, sub: &str) -> String {
        self.encoder.issue(sub, Some("user@example.com"), None).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.encoder.issue("admin-1", None, Some("admin")).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }
}

pub fn msa() -> Value {
    serde_json::json!({
        "title": "MSA",
        "originalFilename": "f.pdf",
        "fileUrl": "https://x/f.pdf",
        "fileType": "application/pdf",
        "fileSize": 1024
    })
}
