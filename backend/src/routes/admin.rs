//! Admin endpoints and the fileserver hit counter

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(metrics_page))
        .route("/reset", post(reset))
        .route("/prometheus", get(prometheus))
}

/// Count a visit to the static file server
pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.increment();
    next.run(request).await
}

/// GET /admin/metrics - Visit count as HTML
async fn metrics_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.hits.get()
    ))
}

/// POST /admin/reset - Wipe users and zero the counter
///
/// Only enabled on the dev platform.
async fn reset(State(state): State<AppState>) -> ApiResult<String> {
    if !state.config().is_dev_platform() {
        warn!(platform = %state.config().platform, "Reset attempted outside dev platform");
        return Err(ApiError::Forbidden("Reset is only allowed in dev".to_string()));
    }

    let deleted = state.store().delete_all_users().await?;
    state.hits.reset();

    info!(deleted, "Store reset");
    Ok(format!(
        "Number of server hits is reset to {}",
        state.hits.get()
    ))
}

/// GET /admin/prometheus - Prometheus exposition of the process metrics
async fn prometheus(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => handle.render().into_response(),
        None => ApiError::NotFound("Metrics recorder not installed".to_string()).into_response(),
    }
}
