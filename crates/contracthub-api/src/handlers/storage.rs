//! Storage handlers: upload, signed download URLs, deletion, and serving
//! locally stored files.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use bytes::Bytes;

use contracthub_core::error::AppError;
use contracthub_core::traits::ObjectStore;
use contracthub_service::UploadedFile;

use crate::dto::request::{DownloadTokenQuery, FileUrlQuery};
use crate::dto::response::{ApiResponse, DownloadUrlResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/storage/upload (multipart: `file`, optional `path`)
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadedFile>>, ApiError> {
    let mut path: Option<String> = None;
    let mut file: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "path" => {
                path = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                file = Some((file_name, mime_type, data));
            }
            _ => {}
        }
    }

    let (file_name, mime_type, data) =
        file.ok_or_else(|| AppError::validation("No file uploaded"))?;

    let uploaded = state
        .storage_service
        .upload(&auth, &file_name, mime_type.as_deref(), data, path.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(uploaded)))
}

/// GET /api/storage/download-url?fileUrl=
pub async fn download_url(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<FileUrlQuery>,
) -> Result<Json<ApiResponse<DownloadUrlResponse>>, ApiError> {
    let download_url = state.storage_service.download_url(&query.file_url).await?;
    Ok(Json(ApiResponse::ok(DownloadUrlResponse { download_url })))
}

/// DELETE /api/storage/delete?fileUrl=
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FileUrlQuery>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.storage_service.delete(&auth, &query.file_url).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("File deleted"))))
}

/// GET /api/storage/files/{*key}?token=
///
/// Serves a file from the local store. Authorised by the signed token in
/// the query string rather than a bearer header, so that download URLs
/// work when opened directly.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<DownloadTokenQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state
        .local_files
        .as_ref()
        .ok_or_else(|| AppError::not_found("File serving is not enabled"))?;

    store.verify_download(&key, &query.token)?;
    let data = store.read(&key).await?;
    let mime = mime_guess::from_path(&key).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], data))
}
