//! Chirp service: validation, profanity filtering and ownership checks

use crate::error::ApiError;
use crate::repositories::Store;
use chirpy_shared::types::ChirpResponse;
use chirpy_shared::validation::validate_chirp;
use tracing::info;
use uuid::Uuid;

/// Chirp service
pub struct ChirpService;

impl ChirpService {
    /// Create a chirp for `user_id` after validation and cleaning
    pub async fn create(
        store: &dyn Store,
        user_id: Uuid,
        body: &str,
    ) -> Result<ChirpResponse, ApiError> {
        let cleaned = validate_chirp(body).map_err(|e| ApiError::Validation(e.to_string()))?;
        let chirp = store.create_chirp(user_id, &cleaned).await?;
        Ok(chirp.into())
    }

    /// All chirps, oldest first
    pub async fn list(store: &dyn Store) -> Result<Vec<ChirpResponse>, ApiError> {
        let chirps = store.list_chirps().await?;
        Ok(chirps.into_iter().map(Into::into).collect())
    }

    pub async fn get(store: &dyn Store, chirp_id: Uuid) -> Result<ChirpResponse, ApiError> {
        store
            .find_chirp(chirp_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApiError::NotFound("Chirp not found".to_string()))
    }

    /// Delete a chirp owned by `user_id`
    pub async fn delete(store: &dyn Store, user_id: Uuid, chirp_id: Uuid) -> Result<(), ApiError> {
        let chirp = store
            .find_chirp(chirp_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Chirp not found".to_string()))?;

        if chirp.user_id != user_id {
            return Err(ApiError::Forbidden(
                "You can only delete your own chirps".to_string(),
            ));
        }

        store.delete_chirp(chirp.id).await?;
        info!(chirp_id = %chirp.id, user_id = %user_id, "Chirp deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::HashedCredential;
    use crate::repositories::{MemoryStore, UserStore};

    async fn store_with_users() -> (MemoryStore, Uuid, Uuid) {
        let store = MemoryStore::new();
        let hash = HashedCredential::from("$argon2id$placeholder".to_string());
        let walt = store.create_user("walt@breakingbad.com", &hash).await.unwrap();
        let jesse = store.create_user("jesse@breakingbad.com", &hash).await.unwrap();
        (store, walt.id, jesse.id)
    }

    #[tokio::test]
    async fn test_create_cleans_profanity() {
        let (store, walt, _) = store_with_users().await;
        let chirp = ChirpService::create(&store, walt, "What a kerfuffle today")
            .await
            .unwrap();
        assert_eq!(chirp.body, "What a **** today");
        assert_eq!(chirp.user_id, walt);
    }

    #[tokio::test]
    async fn test_create_rejects_long_chirp() {
        let (store, walt, _) = store_with_users().await;
        let result = ChirpService::create(&store, walt, &"x".repeat(141)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_only_owner_can_delete() {
        let (store, walt, jesse) = store_with_users().await;
        let chirp = ChirpService::create(&store, walt, "I am the one who knocks")
            .await
            .unwrap();

        let result = ChirpService::delete(&store, jesse, chirp.id).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        ChirpService::delete(&store, walt, chirp.id).await.unwrap();
        let result = ChirpService::get(&store, chirp.id).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_is_oldest_first() {
        let (store, walt, jesse) = store_with_users().await;
        let first = ChirpService::create(&store, walt, "first").await.unwrap();
        let second = ChirpService::create(&store, jesse, "second").await.unwrap();

        let chirps = ChirpService::list(&store).await.unwrap();
        let ids: Vec<Uuid> = chirps.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
