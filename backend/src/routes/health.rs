//! Liveness and readiness probes

use crate::repositories::Store;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

/// Readiness report
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub version: &'static str,
}

/// GET /api/healthz - "OK" while the process is serving
pub async fn healthz() -> &'static str {
    "OK"
}

/// GET /api/readyz - 503 until the store answers
///
/// The store error is logged only; clients see `ready: false`.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    readiness(state.store()).await
}

async fn readiness(store: &dyn Store) -> (StatusCode, Json<Readiness>) {
    let ready = match store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Readiness probe failed: {:?}", e);
            false
        }
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(Readiness {
            ready,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::repositories::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_healthz_returns_ok() {
        assert_eq!(healthz().await, "OK");
    }

    #[tokio::test]
    async fn test_readyz_with_memory_store() {
        let state = AppState::new(Arc::new(MemoryStore::new()), AppConfig::default());
        let (status, Json(report)) = readyz(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(report.ready);
    }
}
