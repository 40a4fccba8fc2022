//! Chirp repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chirpy_shared::types::ChirpResponse;
use uuid::Uuid;

use super::{ChirpStore, PgStore};

/// Chirp record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChirpRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<ChirpRecord> for ChirpResponse {
    fn from(record: ChirpRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            body: record.body,
            user_id: record.user_id,
        }
    }
}

#[async_trait]
impl ChirpStore for PgStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord> {
        let chirp = sqlx::query_as::<_, ChirpRecord>(
            r#"
            INSERT INTO chirps (body, user_id)
            VALUES ($1, $2)
            RETURNING id, created_at, updated_at, body, user_id
            "#,
        )
        .bind(body)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<ChirpRecord>> {
        let chirps = sqlx::query_as::<_, ChirpRecord>(
            r#"
            SELECT id, created_at, updated_at, body, user_id
            FROM chirps
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(chirps)
    }

    async fn find_chirp(&self, id: Uuid) -> Result<Option<ChirpRecord>> {
        let chirp = sqlx::query_as::<_, ChirpRecord>(
            r#"
            SELECT id, created_at, updated_at, body, user_id
            FROM chirps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(chirp)
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
