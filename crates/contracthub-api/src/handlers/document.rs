//! Document handlers: CRUD and processing.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use contracthub_core::error::AppError;
use contracthub_entity::document::Document;

use crate::dto::request::{CreateDocumentRequest, DocumentQuery, UpdateDocumentRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/documents
pub async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), ApiError> {
    let document = state.document_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(document))))
}

/// GET /api/documents?status=&tag=&search=
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<DocumentQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Document>>>, ApiError> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let documents = state
        .document_service
        .list(&auth, &query.into())
        .await?;
    Ok(Json(ApiResponse::ok(documents)))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let document = state.document_service.get(&auth, parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(document)))
}

/// PATCH /api/documents/{id}
pub async fn update_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateDocumentRequest>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let document = state
        .document_service
        .update(&auth, parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(document)))
}

/// DELETE /api/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.document_service.remove(&auth, parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Document deleted"))))
}

/// POST /api/documents/{id}/process
///
/// Runs extraction synchronously; the response carries the final record.
pub async fn process_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let document = state
        .document_service
        .process(&auth, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(document)))
}
