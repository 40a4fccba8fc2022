//! Payment provider webhook

use crate::auth::PolkaCaller;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chirpy_shared::types::PolkaWebhookRequest;

/// Create webhook routes
pub fn polka_routes() -> Router<AppState> {
    Router::new().route("/webhooks", post(handle_webhook))
}

/// POST /api/polka/webhooks
///
/// # Authentication
/// Requires `Authorization: ApiKey <key>` matching the configured Polka key.
async fn handle_webhook(
    State(state): State<AppState>,
    _caller: PolkaCaller,
    Json(req): Json<PolkaWebhookRequest>,
) -> ApiResult<StatusCode> {
    UserService::apply_webhook(state.store(), &req).await?;
    Ok(StatusCode::NO_CONTENT)
}
