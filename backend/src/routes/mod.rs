//! Route definitions for the Chirpy API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod admin;
mod chirps;
mod health;
mod polka;
mod session;
mod users;


pub use admin::admin_routes;
pub use chirps::chirp_routes;
pub use polka::polka_routes;
pub use session::session_routes;
pub use users::user_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .nest("/admin", admin::admin_routes())
        .merge(file_server(&state))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .merge(session::session_routes())
        .merge(users::user_routes())
        .merge(chirps::chirp_routes())
        .nest("/polka", polka::polka_routes())
}

/// Static files under `/app`, counted by the hit middleware
fn file_server(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest_service("/app", ServeDir::new(&state.config().filepath_root))
        .layer(middleware::from_fn_with_state(state.clone(), admin::count_hits))
}
