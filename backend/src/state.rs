//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything here is built once at startup from [`AppConfig`] and is
//! read-only afterwards, apart from the fileserver hit counter.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::Store;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::SecretString;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Visits to the static file server since start or last reset
#[derive(Debug, Default)]
pub struct FileserverHits(AtomicU64);

impl FileserverHits {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Shared application state
///
/// All fields are designed for cheap cloning across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator
    pub store: Arc<dyn Store>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Expected key on webhook calls
    polka_key: Arc<SecretString>,
    /// Static file server hit counter
    pub hits: Arc<FileserverHits>,
    /// Prometheus render handle, when a recorder was installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// # Note
    /// This pre-computes JWT keys from the config secret and should only
    /// be called once at application startup.
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let jwt = JwtService::new(
            config.jwt.secret.as_bytes(),
            config.jwt.access_token_ttl_secs,
        );
        let polka_key = Arc::new(SecretString::new(config.polka.api_key.clone()));

        Self {
            store,
            config: Arc::new(config),
            jwt,
            polka_key,
            hits: Arc::new(FileserverHits::default()),
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for `/admin/prometheus`
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Get a reference to the store
    #[inline]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get the webhook API key
    #[inline]
    pub fn polka_key(&self) -> &SecretString {
        &self.polka_key
    }
}
