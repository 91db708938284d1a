//! Identity handlers.

use axum::Json;
use axum::extract::State;

use contracthub_core::types::Identity;

use crate::dto::request::VerifyTokenRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/verify
///
/// The only endpoint besides health that does not require a bearer token.
pub async fn verify(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyTokenRequest>,
) -> Result<Json<ApiResponse<Identity>>, ApiError> {
    let identity = state.verifier.verify(&req.token).await?;
    Ok(Json(ApiResponse::ok(identity)))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<Identity>> {
    Json(ApiResponse::ok(Identity::new(
        auth.user_id.clone(),
        auth.email.clone(),
        Some(auth.role.clone()),
    )))
}
