//! ContractHub Server: contract lifecycle management backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use contracthub_ai::{OpenAiClient, Summarizer};
use contracthub_api::AppState;
use contracthub_auth::JwtIdentityVerifier;
use contracthub_core::config::{AppConfig, DatabaseProvider, LogFormat};
use contracthub_database::connection::mask_password;
use contracthub_database::migration::run_migrations;
use contracthub_database::{
    ContractRepository, DatabasePool, DocumentRepository, MemoryContractRepository,
    MemoryDocumentRepository, PgContractRepository, PgDocumentRepository,
};
use contracthub_extract::HttpTextExtractor;
use contracthub_service::{ContractService, DocumentPipeline, DocumentService, StorageService};
use contracthub_storage::build_object_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("CONTRACTHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("Failed to load configuration")?;

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    run(config).await.context("Server error")
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Repository pair selected by `database.provider`.
async fn repositories(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn ContractRepository>, Arc<dyn DocumentRepository>)> {
    match config.database.provider {
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory repositories; data is lost on restart");
            Ok((
                Arc::new(MemoryContractRepository::new()),
                Arc::new(MemoryDocumentRepository::new()),
            ))
        }
        DatabaseProvider::Postgres => {
            tracing::info!(url = %mask_password(&config.database.url), "Connecting to database...");
            let pool = DatabasePool::connect(&config.database).await?.into_pool();

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                run_migrations(&pool).await?;
                tracing::info!("Database migrations complete");
            }

            Ok((
                Arc::new(PgContractRepository::new(pool.clone())),
                Arc::new(PgDocumentRepository::new(pool)),
            ))
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting ContractHub v{}", env!("CARGO_PKG_VERSION"));

    let (contracts, documents) = repositories(&config).await?;

    tracing::info!(provider = ?config.storage.provider, "Initializing object store...");
    let stores = build_object_store(&config.storage).await?;

    let extractor = Arc::new(HttpTextExtractor::new(&config.extraction)?);
    let completion = Arc::new(OpenAiClient::new(&config.ai)?);
    if config.ai.api_key().is_none() {
        tracing::warn!("No AI API key configured; summaries will use the placeholder text");
    }
    let summarizer = Arc::new(Summarizer::new(completion, &config.ai));

    let verifier = Arc::new(JwtIdentityVerifier::new(&config.auth)?);

    let contract_service = Arc::new(ContractService::new(
        contracts,
        stores.store.clone(),
        extractor.clone(),
        summarizer,
    ));
    let pipeline = DocumentPipeline::new(documents.clone(), stores.store.clone(), extractor);
    let document_service = Arc::new(DocumentService::new(
        documents,
        stores.store.clone(),
        pipeline,
    ));
    let storage_service = Arc::new(StorageService::new(
        stores.store,
        config.storage.max_upload_size_bytes,
    ));

    let state = AppState {
        config: Arc::new(config),
        verifier,
        contract_service,
        document_service,
        storage_service,
        local_files: stores.local,
        started_at: Instant::now(),
    };

    contracthub_api::serve(state).await?;
    tracing::info!("ContractHub shut down gracefully");
    Ok(())
}
