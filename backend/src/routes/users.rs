//! User account routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{SessionService, UserService};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chirpy_shared::types::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user).put(update_user))
}

/// POST /api/users - Register a new account
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::register(state.store(), &req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users - Change the caller's email and password
///
/// # Authentication
/// Requires valid Bearer access token in Authorization header.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user =
        SessionService::update_credentials(state.store(), auth.user_id, &req.email, &req.password)
            .await?;
    Ok(Json(user))
}
