//! Chirp API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ChirpService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chirpy_shared::types::{ChirpResponse, CreateChirpRequest};
use uuid::Uuid;

/// Create chirp routes
pub fn chirp_routes() -> Router<AppState> {
    Router::new()
        .route("/chirps", post(create_chirp).get(list_chirps))
        .route("/chirps/:chirp_id", get(get_chirp).delete(delete_chirp))
}

/// POST /api/chirps - Post a chirp as the authenticated user
async fn create_chirp(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateChirpRequest>,
) -> ApiResult<(StatusCode, Json<ChirpResponse>)> {
    let chirp = ChirpService::create(state.store(), auth.user_id, &req.body).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// GET /api/chirps - All chirps, oldest first
async fn list_chirps(State(state): State<AppState>) -> ApiResult<Json<Vec<ChirpResponse>>> {
    Ok(Json(ChirpService::list(state.store()).await?))
}

/// GET /api/chirps/:chirp_id
async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<Uuid>,
) -> ApiResult<Json<ChirpResponse>> {
    Ok(Json(ChirpService::get(state.store(), chirp_id).await?))
}

/// DELETE /api/chirps/:chirp_id - Only the author may delete
async fn delete_chirp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(chirp_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ChirpService::delete(state.store(), auth.user_id, chirp_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
