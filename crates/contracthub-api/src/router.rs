//! Route definitions for the ContractHub HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};

use crate::handlers;
use crate::state::AppState;

/// Multipart framing allowance on top of the configured upload size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the API routes. Middleware is applied in [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let upload_limit = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(contract_routes())
        .merge(document_routes())
        .merge(storage_routes(upload_limit));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Token verification and the caller's identity
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/verify", post(handlers::auth::verify))
        .route("/auth/me", get(handlers::auth::me))
}

/// Contract CRUD, status, summary, versions, extraction
fn contract_routes() -> Router<AppState> {
    use handlers::contract::*;

    Router::new()
        .route("/contracts", get(list_contracts).post(create_contract))
        .route("/contracts/extract", post(extract_text))
        .route(
            "/contracts/{id}",
            get(get_contract).patch(update_contract).delete(delete_contract),
        )
        .route("/contracts/{id}/status", patch(update_status))
        .route("/contracts/{id}/summary", patch(update_summary))
        .route("/contracts/{id}/summarize", post(summarize_contract))
        .route("/contracts/{id}/metadata", post(extract_metadata))
        .route("/contracts/{id}/versions", get(list_versions).post(add_version))
}

/// Document CRUD and processing
fn document_routes() -> Router<AppState> {
    use handlers::document::*;

    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{id}",
            get(get_document).patch(update_document).delete(delete_document),
        )
        .route("/documents/{id}/process", post(process_document))
}

/// Upload, download URLs, deletion, local file serving
fn storage_routes(upload_limit: usize) -> Router<AppState> {
    use handlers::storage::*;

    Router::new()
        .route(
            "/storage/upload",
            post(upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/storage/download-url", get(download_url))
        .route("/storage/delete", delete(delete_file))
        .route("/storage/files/{*key}", get(serve_file))
}
