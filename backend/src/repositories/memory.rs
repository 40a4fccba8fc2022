//! In-process store
//!
//! Mirrors the PostgreSQL schema closely enough for tests and local runs:
//! unique emails, unique token values, cascade on user deletion and a
//! first-write-wins `revoked_at`.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ChirpRecord, ChirpStore, DuplicateEmail, NewRefreshToken, RefreshTokenRecord, RefreshTokenStore, Store,
    UserRecord, UserStore,
};
use crate::auth::HashedCredential;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
    chirps: Vec<ChirpRecord>,
}

/// Store that keeps every table in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, hashed: &HashedCredential) -> Result<UserRecord> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(DuplicateEmail.into());
        }

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed.as_str().to_string(),
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn update_user_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed: &HashedCredential,
    ) -> Result<Option<UserRecord>> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(DuplicateEmail.into());
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.email = email.to_string();
        user.hashed_password = hashed.as_str().to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let deleted = tables.users.len() as u64;
        *tables = Tables::default();
        Ok(deleted)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn save_refresh_token(&self, token: &NewRefreshToken) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&token.user_id) {
            bail!("refresh token references unknown user {}", token.user_id);
        }
        if tables.refresh_tokens.contains_key(&token.token) {
            bail!("duplicate key value violates unique constraint \"refresh_tokens_pkey\"");
        }

        let now = Utc::now();
        tables.refresh_tokens.insert(
            token.token.clone(),
            RefreshTokenRecord {
                token: token.token.clone(),
                created_at: now,
                updated_at: now,
                user_id: token.user_id,
                expires_at: token.expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        Ok(self.tables.read().await.refresh_tokens.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.refresh_tokens.get_mut(token) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(at);
                record.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            bail!("chirp references unknown user {}", user_id);
        }

        let now = Utc::now();
        let chirp = ChirpRecord {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<ChirpRecord>> {
        let mut chirps = self.tables.read().await.chirps.clone();
        chirps.sort_by_key(|c| c.created_at);
        Ok(chirps)
    }

    async fn find_chirp(&self, id: Uuid) -> Result<Option<ChirpRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
