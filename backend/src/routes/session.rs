//! Session routes
//!
//! Login, access token refresh and refresh token revocation.
//!
//! # Performance Optimizations
//!
//! - Uses pre-computed JWT keys from AppState (no per-request allocation)
//! - Password verification runs on blocking thread pool

use crate::auth::BearerToken;
use crate::error::ApiResult;
use crate::services::SessionService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chirpy_shared::types::{LoginRequest, LoginResponse, RefreshResponse};

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/revoke", post(revoke))
}

/// Login with email and password
///
/// POST /api/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = SessionService::login(state.store(), state.jwt(), &req).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new access token
///
/// POST /api/refresh
///
/// # Authentication
/// Requires the refresh token as Bearer credential.
async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<RefreshResponse>> {
    let response = SessionService::refresh(state.store(), state.jwt(), &token).await?;
    Ok(Json(response))
}

/// Revoke a refresh token
///
/// POST /api/revoke
async fn revoke(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<StatusCode> {
    SessionService::revoke(state.store(), &token).await?;
    Ok(StatusCode::NO_CONTENT)
}
