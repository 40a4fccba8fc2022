//! User service for account creation and upgrades
//!
//! # Performance Optimizations
//!
//! - Password hashing runs on blocking thread pool

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{DuplicateEmail, Store};
use chirpy_shared::types::{PolkaWebhookRequest, UserResponse, POLKA_USER_UPGRADED};
use tracing::{debug, info};
use uuid::Uuid;
use validator::ValidateEmail;

/// Check email format and that a password was supplied
pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if !email.validate_email() {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("Password cannot be empty".to_string()));
    }
    Ok(())
}

/// Map a user write failure, turning a lost race on the email into 409
pub(crate) fn email_write_error(err: anyhow::Error) -> ApiError {
    if err.is::<DuplicateEmail>() {
        email_taken()
    } else {
        ApiError::Internal(err)
    }
}

pub(crate) fn email_taken() -> ApiError {
    ApiError::Conflict("Email already registered".to_string())
}

/// Outcome of a webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Upgraded,
    Ignored,
}

/// User service for account operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// # Performance
    /// Password hashing is offloaded to blocking thread pool via `spawn_blocking`.
    pub async fn register(
        store: &dyn Store,
        email: &str,
        password: &str,
    ) -> Result<UserResponse, ApiError> {
        validate_credentials(email, password)?;

        // Check if email already exists
        if store.email_exists(email).await? {
            return Err(email_taken());
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let hashed = PasswordService::hash_async(password.to_string())
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        // A concurrent registration may still take the email first.
        let user = store
            .create_user(email, &hashed)
            .await
            .map_err(email_write_error)?;

        info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Apply a payment provider webhook
    ///
    /// Events other than `user.upgraded` are acknowledged and ignored.
    pub async fn apply_webhook(
        store: &dyn Store,
        req: &PolkaWebhookRequest,
    ) -> Result<WebhookOutcome, ApiError> {
        if req.event != POLKA_USER_UPGRADED {
            debug!(event = %req.event, "Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored);
        }

        let user_id = Uuid::parse_str(&req.data.user_id)
            .map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))?;

        if !store.upgrade_to_chirpy_red(user_id).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(user_id = %user_id, "User upgraded to Chirpy Red");
        Ok(WebhookOutcome::Upgraded)
    }
}
