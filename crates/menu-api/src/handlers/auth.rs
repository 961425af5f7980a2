// ============================================================================
// Menu API - Auth Handlers
// File: crates/menu-api/src/handlers/auth.rs
// ============================================================================
//! Admin login, logout and current-user endpoints

use axum::{
    extract::State,
    http::HeaderMap,
    Extension, Json,
};

use menu_core::domain::AuthUser;

use crate::dto::{LoginRequest, LoginResponse, UserDto};
use crate::error::ApiError;
use crate::middleware::bearer_token;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login handler - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let session = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(ApiResponse::success(session.into())))
}

/// Logout handler - POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
    state.auth.logout(token).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Current user - GET /api/v1/auth/me
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(user.into()))
}
