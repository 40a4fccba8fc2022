//! Session orchestration: login, refresh, revoke and credential changes
//!
//! This is the only layer that decides what a client sees when
//! authentication fails. Every specific reason (unknown account, wrong
//! password, corrupted hash, bad or expired token, revoked refresh token)
//! is logged here and then collapsed into one generic 401.

use crate::auth::{
    JwtService, PasswordError, PasswordService, RefreshTokenError, RefreshTokenManager,
};
use crate::error::ApiError;
use crate::repositories::Store;
use crate::services::user::{email_taken, email_write_error, validate_credentials};
use chirpy_shared::types::{LoginRequest, LoginResponse, RefreshResponse, UserResponse};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Inputs shorter than this cannot be a valid login
const MIN_LOGIN_FIELD_LEN: usize = 5;

fn auth_failure(reason: &'static str) {
    metrics::counter!("chirpy_auth_failures_total", "reason" => reason).increment(1);
}

fn refresh_failure(err: RefreshTokenError) -> ApiError {
    match err {
        RefreshTokenError::Storage(e) => {
            error!("Refresh token storage failure: {:?}", e);
            ApiError::Internal(e)
        }
        other => {
            debug!(reason = other.reason(), "Refresh token rejected");
            auth_failure(other.reason());
            ApiError::unauthorized()
        }
    }
}

/// Session service
pub struct SessionService;

impl SessionService {
    /// Log in with email and password
    ///
    /// Issues an access token (requested lifetime clamped to one hour) and
    /// a persisted refresh token.
    pub async fn login(
        store: &dyn Store,
        jwt_service: &JwtService,
        req: &LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        if req.email.len() < MIN_LOGIN_FIELD_LEN || req.password.len() < MIN_LOGIN_FIELD_LEN {
            auth_failure("short_input");
            return Err(ApiError::invalid_credentials());
        }

        let user = match store.find_user_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                debug!("Login for unknown account");
                auth_failure("unknown_account");
                return Err(ApiError::invalid_credentials());
            }
        };

        // Password verification is offloaded to the blocking thread pool.
        match PasswordService::verify_async(req.password.clone(), user.credential()).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = %user.id, "Login with wrong password");
                auth_failure("wrong_password");
                return Err(ApiError::invalid_credentials());
            }
            Err(PasswordError::MalformedHash(detail)) => {
                warn!(user_id = %user.id, %detail, "Stored password hash is malformed");
                auth_failure("malformed_hash");
                return Err(ApiError::invalid_credentials());
            }
            Err(e) => return Err(ApiError::Internal(e.into())),
        }

        let ttl = jwt_service.effective_ttl(req.expires_in_seconds);
        let token = jwt_service
            .issue(user.id, ttl)
            .map_err(|e| ApiError::Internal(e.into()))?;

        let refresh = RefreshTokenManager::new(store)
            .issue(user.id)
            .await
            .map_err(refresh_failure)?;

        metrics::counter!("chirpy_logins_total").increment(1);
        info!(user_id = %user.id, ttl_secs = ttl.num_seconds(), "User logged in");

        Ok(LoginResponse {
            user: user.into(),
            token,
            refresh_token: refresh.token,
        })
    }

    /// Mint a new access token from a refresh token
    ///
    /// The refresh token itself is neither rotated nor extended.
    pub async fn refresh(
        store: &dyn Store,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<RefreshResponse, ApiError> {
        let user_id = RefreshTokenManager::new(store)
            .resolve(refresh_token)
            .await
            .map_err(refresh_failure)?;

        let token = jwt_service
            .issue(user_id, jwt_service.default_ttl())
            .map_err(|e| ApiError::Internal(e.into()))?;

        debug!(user_id = %user_id, "Access token refreshed");
        Ok(RefreshResponse { token })
    }

    /// Revoke a refresh token
    ///
    /// Succeeds for unknown and already-revoked tokens. Access tokens issued
    /// earlier stay valid until they expire.
    pub async fn revoke(store: &dyn Store, refresh_token: &str) -> Result<(), ApiError> {
        let revoked = RefreshTokenManager::new(store)
            .revoke(refresh_token)
            .await
            .map_err(refresh_failure)?;

        debug!(revoked, "Refresh token revocation requested");
        Ok(())
    }

    /// Replace the acting user's email and password
    ///
    /// `user_id` comes from a validated access token.
    pub async fn update_credentials(
        store: &dyn Store,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<UserResponse, ApiError> {
        validate_credentials(email, password)?;

        let current = store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if current.email != email && store.email_exists(email).await? {
            return Err(email_taken());
        }

        let hashed = PasswordService::hash_async(password.to_string())
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let user = store
            .update_user_credentials(user_id, email, &hashed)
            .await
            .map_err(email_write_error)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, "User credentials updated");
        Ok(user.into())
    }
}
