//! Refresh token management
//!
//! Refresh tokens are opaque: 32 random bytes, hex encoded, persisted with
//! an expiry and a revocation tombstone. A token resolves to its user only
//! while `now < expires_at` and `revoked_at` is unset.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::REFRESH_TOKEN_TTL_SECS;
use crate::repositories::{NewRefreshToken, RefreshTokenStore};

/// Random bytes per refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Refresh token failures
///
/// `NotFound`, `Expired` and `Revoked` are all reported to clients as 401.
#[derive(Error, Debug)]
pub enum RefreshTokenError {
    #[error("refresh token not found")]
    NotFound,

    #[error("refresh token expired at {0}")]
    Expired(DateTime<Utc>),

    #[error("refresh token revoked at {0}")]
    Revoked(DateTime<Utc>),

    #[error("refresh token storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl RefreshTokenError {
    /// Short label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            RefreshTokenError::NotFound => "not_found",
            RefreshTokenError::Expired(_) => "expired",
            RefreshTokenError::Revoked(_) => "revoked",
            RefreshTokenError::Storage(_) => "storage",
        }
    }
}

/// A freshly issued refresh token
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a new opaque refresh token value
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issues, resolves and revokes refresh tokens against a store
pub struct RefreshTokenManager<'a, S: RefreshTokenStore + ?Sized> {
    store: &'a S,
    ttl: Duration,
}

impl<'a, S: RefreshTokenStore + ?Sized> RefreshTokenManager<'a, S> {
    /// Manager with the fixed 60-day lifetime
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            ttl: Duration::seconds(REFRESH_TOKEN_TTL_SECS),
        }
    }

    /// Issue and persist a token for `user_id`
    pub async fn issue(&self, user_id: Uuid) -> Result<IssuedRefreshToken, RefreshTokenError> {
        self.issue_at(user_id, Utc::now()).await
    }

    pub async fn issue_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<IssuedRefreshToken, RefreshTokenError> {
        let issued = IssuedRefreshToken {
            token: generate_refresh_token(),
            expires_at: now + self.ttl,
        };

        self.store
            .save_refresh_token(&NewRefreshToken {
                token: issued.token.clone(),
                user_id,
                expires_at: issued.expires_at,
            })
            .await?;

        debug!(user_id = %user_id, expires_at = %issued.expires_at, "Refresh token issued");
        Ok(issued)
    }

    /// Resolve a presented token to the user it was issued to
    pub async fn resolve(&self, token: &str) -> Result<Uuid, RefreshTokenError> {
        self.resolve_at(token, Utc::now()).await
    }

    pub async fn resolve_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid, RefreshTokenError> {
        let record = self
            .store
            .find_refresh_token(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)?;

        if let Some(revoked_at) = record.revoked_at {
            return Err(RefreshTokenError::Revoked(revoked_at));
        }
        if now >= record.expires_at {
            return Err(RefreshTokenError::Expired(record.expires_at));
        }

        Ok(record.user_id)
    }

    /// Revoke a token. Unknown and already-revoked tokens are not errors.
    ///
    /// Returns whether this call changed anything.
    pub async fn revoke(&self, token: &str) -> Result<bool, RefreshTokenError> {
        self.revoke_at(token, Utc::now()).await
    }

    pub async fn revoke_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, RefreshTokenError> {
        Ok(self.store.mark_revoked(token, now).await?)
    }
}
