//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use contracthub_core::config::AppConfig;
use contracthub_core::traits::IdentityVerifier;
use contracthub_service::{ContractService, DocumentService, StorageService};
use contracthub_storage::LocalObjectStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Bearer token verifier
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Contract service
    pub contract_service: Arc<ContractService>,
    /// Document service
    pub document_service: Arc<DocumentService>,
    /// Upload and download service
    pub storage_service: Arc<StorageService>,
    /// Local store for serving signed file downloads; `None` with S3.
    pub local_files: Option<Arc<LocalObjectStore>>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}
