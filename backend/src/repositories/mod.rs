//! Database repositories
//!
//! Storage is reached through the [`Store`] traits so the session logic
//! can run against PostgreSQL ([`PgStore`]) or in process ([`MemoryStore`]).

pub mod chirp;
pub mod memory;
pub mod refresh_token;
pub mod user;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::HashedCredential;

pub use chirp::ChirpRecord;
pub use memory::MemoryStore;
pub use refresh_token::{NewRefreshToken, RefreshTokenRecord};
pub use user::UserRecord;

/// Raised by [`UserStore`] writes that hit the unique email constraint
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("email already registered")]
pub struct DuplicateEmail;

/// User account persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account; fails with [`DuplicateEmail`] if the email is taken
    async fn create_user(&self, email: &str, hashed: &HashedCredential) -> Result<UserRecord>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Replace email and password hash together. `None` if the user is gone,
    /// [`DuplicateEmail`] if another account holds the email.
    async fn update_user_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed: &HashedCredential,
    ) -> Result<Option<UserRecord>>;

    /// Set `is_chirpy_red`. Returns false when no such user exists.
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool>;

    /// Delete every user; chirps and refresh tokens go with them
    async fn delete_all_users(&self) -> Result<u64>;
}

/// Refresh token persistence
///
/// Implementations must make a revoke visible to every later lookup.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new token; fails if the value already exists
    async fn save_refresh_token(&self, token: &NewRefreshToken) -> Result<()>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Set `revoked_at` if it is not already set.
    ///
    /// Returns true when this call revoked the token. Unknown and
    /// already-revoked tokens return false.
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool>;
}

/// Chirp persistence
#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord>;

    /// All chirps, oldest first
    async fn list_chirps(&self) -> Result<Vec<ChirpRecord>>;

    async fn find_chirp(&self, id: Uuid) -> Result<Option<ChirpRecord>>;

    async fn delete_chirp(&self, id: Uuid) -> Result<bool>;
}

/// Everything the HTTP layer needs from storage
#[async_trait]
pub trait Store: UserStore + RefreshTokenStore + ChirpStore {
    /// Cheap liveness probe of the backing storage
    async fn ping(&self) -> Result<()>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        crate::db::health_check(&self.pool).await
    }
}
