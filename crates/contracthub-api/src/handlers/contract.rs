//! Contract handlers: CRUD, status, summary, versions, extraction.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use bytes::Bytes;

use contracthub_ai::ContractMetadata;
use contracthub_core::error::AppError;
use contracthub_entity::contract::{ContractVersion, ContractWithVersions};

use crate::dto::request::{
    AddVersionRequest, CreateContractRequest, ExtractRequest, TextRequest, UpdateContractRequest,
    UpdateStatusRequest, UpdateSummaryRequest,
};
use crate::dto::response::{ApiResponse, ExtractResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/contracts
pub async fn create_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateContractRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContractWithVersions>>), ApiError> {
    let created = state.contract_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// GET /api/contracts
pub async fn list_contracts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ContractWithVersions>>>, ApiError> {
    let contracts = state.contract_service.find_all(&auth).await?;
    Ok(Json(ApiResponse::ok(contracts)))
}

/// GET /api/contracts/{id}
pub async fn get_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ContractWithVersions>>, ApiError> {
    let contract = state
        .contract_service
        .find_one(&auth, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(contract)))
}

/// PATCH /api/contracts/{id}
pub async fn update_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateContractRequest>,
) -> Result<Json<ApiResponse<ContractWithVersions>>, ApiError> {
    let contract = state
        .contract_service
        .update(&auth, parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(contract)))
}

/// DELETE /api/contracts/{id}
pub async fn delete_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.contract_service.remove(&auth, parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Contract deleted"))))
}

/// PATCH /api/contracts/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<ContractWithVersions>>, ApiError> {
    let contract = state
        .contract_service
        .update_status(&auth, parse_uuid(&id)?, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(contract)))
}

/// PATCH /api/contracts/{id}/summary
pub async fn update_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateSummaryRequest>,
) -> Result<Json<ApiResponse<ContractWithVersions>>, ApiError> {
    let contract = state
        .contract_service
        .update_summary(&auth, parse_uuid(&id)?, req.summary)
        .await?;
    Ok(Json(ApiResponse::ok(contract)))
}

/// POST /api/contracts/{id}/summarize
///
/// The body is optional; `{"text": "..."}` overrides the contract text.
pub async fn summarize_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<ContractWithVersions>>, ApiError> {
    let req = optional_body(&body)?;
    let contract = state
        .contract_service
        .generate_summary(&auth, parse_uuid(&id)?, req.text)
        .await?;
    Ok(Json(ApiResponse::ok(contract)))
}

/// POST /api/contracts/{id}/metadata
pub async fn extract_metadata(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<ContractMetadata>>, ApiError> {
    let req = optional_body(&body)?;
    let metadata = state
        .contract_service
        .extract_metadata(&auth, parse_uuid(&id)?, req.text)
        .await?;
    Ok(Json(ApiResponse::ok(metadata)))
}

/// GET /api/contracts/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ContractVersion>>>, ApiError> {
    let versions = state
        .contract_service
        .list_versions(&auth, parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(versions)))
}

/// POST /api/contracts/{id}/versions
pub async fn add_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddVersionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContractVersion>>), ApiError> {
    let version = state
        .contract_service
        .add_version(&auth, parse_uuid(&id)?, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(version))))
}

/// POST /api/contracts/extract
pub async fn extract_text(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ExtractRequest>,
) -> Result<Json<ApiResponse<ExtractResponse>>, ApiError> {
    let extracted = state.contract_service.extract_file(&req.file_url).await?;
    Ok(Json(ApiResponse::ok(extracted.into())))
}

fn optional_body(body: &Bytes) -> Result<TextRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TextRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))
}
