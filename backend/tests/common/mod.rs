//! Common test utilities for integration tests
//!
//! Every test gets its own router over a fresh in-memory store, so the
//! suite runs without a database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use chirpy_backend::{
    auth::HashedCredential,
    config::AppConfig,
    repositories::{
        ChirpRecord, ChirpStore, MemoryStore, NewRefreshToken, RefreshTokenRecord,
        RefreshTokenStore, Store, UserRecord, UserStore,
    },
    routes,
    state::AppState,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use fake::{faker::internet::en::SafeEmail, Fake};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "04234-correct-horse";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

/// A registered and logged-in user
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Create a new test application on the dev platform
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }

    pub fn with_store(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let state = AppState::new(store, config);
        let app = routes::create_router(state.clone());
        Self { app, state }
    }

    /// Send a request and collect the body as a string
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(auth) = authorization {
            builder = builder.header("Authorization", auth);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.request("GET", path, None, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, String) {
        self.request("POST", path, None, Some(body)).await
    }

    /// POST with `Authorization: Bearer <token>`
    pub async fn post_bearer(
        &self,
        path: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        self.request("POST", path, Some(&format!("Bearer {}", token)), body)
            .await
    }

    /// PUT with `Authorization: Bearer <token>`
    pub async fn put_bearer(&self, path: &str, token: &str, body: Value) -> (StatusCode, String) {
        self.request("PUT", path, Some(&format!("Bearer {}", token)), Some(body))
            .await
    }

    /// DELETE with `Authorization: Bearer <token>`
    pub async fn delete_bearer(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.request("DELETE", path, Some(&format!("Bearer {}", token)), None)
            .await
    }

    /// Register a user with a random email
    pub async fn register(&self) -> (String, Value) {
        let fake_email: String = SafeEmail().fake();
        let email = format!("{}.{}", &Uuid::new_v4().simple().to_string()[..8], fake_email);
        let (status, body) = self
            .post("/api/users", json!({ "email": email, "password": TEST_PASSWORD }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        (email, serde_json::from_str(&body).unwrap())
    }

    /// Register a user and log in
    pub async fn login_new_user(&self) -> Session {
        let (email, _) = self.register().await;
        let (status, body) = self
            .post("/api/login", json!({ "email": email, "password": TEST_PASSWORD }))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        let body: Value = serde_json::from_str(&body).unwrap();
        Session {
            user_id: body["id"].as_str().unwrap().to_string(),
            email,
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    config.polka.api_key = POLKA_KEY.to_string();
    config.platform = "dev".to_string();
    config
}

/// In-memory store with switchable failures
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    /// Every refresh token insert fails
    pub fail_refresh_writes: bool,
    /// `ping` fails with connection details in the message
    pub fail_ping: bool,
}

#[async_trait]
impl UserStore for FaultyStore {
    async fn create_user(
        &self,
        email: &str,
        hashed: &HashedCredential,
    ) -> anyhow::Result<UserRecord> {
        self.inner.create_user(email, hashed).await
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        self.inner.find_user_by_email(email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>> {
        self.inner.find_user_by_id(id).await
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        self.inner.email_exists(email).await
    }

    async fn update_user_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed: &HashedCredential,
    ) -> anyhow::Result<Option<UserRecord>> {
        self.inner.update_user_credentials(id, email, hashed).await
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> anyhow::Result<bool> {
        self.inner.upgrade_to_chirpy_red(id).await
    }

    async fn delete_all_users(&self) -> anyhow::Result<u64> {
        self.inner.delete_all_users().await
    }
}

#[async_trait]
impl RefreshTokenStore for FaultyStore {
    async fn save_refresh_token(&self, token: &NewRefreshToken) -> anyhow::Result<()> {
        if self.fail_refresh_writes {
            anyhow::bail!("could not write refresh_tokens: disk full");
        }
        self.inner.save_refresh_token(token).await
    }

    async fn find_refresh_token(&self, token: &str) -> anyhow::Result<Option<RefreshTokenRecord>> {
        self.inner.find_refresh_token(token).await
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> anyhow::Result<bool> {
        self.inner.mark_revoked(token, at).await
    }
}

#[async_trait]
impl ChirpStore for FaultyStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> anyhow::Result<ChirpRecord> {
        self.inner.create_chirp(user_id, body).await
    }

    async fn list_chirps(&self) -> anyhow::Result<Vec<ChirpRecord>> {
        self.inner.list_chirps().await
    }

    async fn find_chirp(&self, id: Uuid) -> anyhow::Result<Option<ChirpRecord>> {
        self.inner.find_chirp(id).await
    }

    async fn delete_chirp(&self, id: Uuid) -> anyhow::Result<bool> {
        self.inner.delete_chirp(id).await
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn ping(&self) -> anyhow::Result<()> {
        if self.fail_ping {
            anyhow::bail!("error connecting to server: db.internal:5432 refused");
        }
        self.inner.ping().await
    }
}
