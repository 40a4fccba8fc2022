//! Authentication extractors
//!
//! Axum extractors for the three credentials the API accepts: an access
//! token (`AuthUser`), a raw bearer credential used by the refresh and
//! revoke endpoints (`BearerToken`), and the webhook API key (`PolkaCaller`).
//!
//! # Performance
//!
//! Uses pre-computed JWT keys from AppState to avoid expensive
//! key derivation on every request.

use crate::auth::header::{extract_api_key, extract_bearer, HeaderError};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::FromRef, http::request::Parts};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

fn header_rejection(err: HeaderError) -> ApiError {
    debug!(error = %err, "Authorization header rejected");
    metrics::counter!("chirpy_auth_failures_total", "reason" => "header").increment(1);
    ApiError::unauthorized()
}

/// Authenticated user extracted from an access token
///
/// Every validation failure becomes the same 401; the reason is only logged.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_bearer(&parts.headers).map_err(header_rejection)?;

        let user_id = app_state.jwt().validate(token).map_err(|e| {
            debug!(reason = e.reason(), "Access token rejected");
            metrics::counter!("chirpy_auth_failures_total", "reason" => e.reason()).increment(1);
            ApiError::unauthorized()
        })?;

        Ok(AuthUser { user_id })
    }
}

/// The credential from `Authorization: Bearer <token>`, unvalidated
///
/// The refresh and revoke endpoints carry the opaque refresh token here.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).map_err(header_rejection)?;
        Ok(BearerToken(token.to_string()))
    }
}

/// A request carrying the configured Polka API key
#[derive(Debug, Clone, Copy)]
pub struct PolkaCaller;

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for PolkaCaller
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let presented = extract_api_key(&parts.headers).map_err(header_rejection)?;
        let expected = app_state.polka_key().expose_secret();

        // An unset key never matches.
        let matches = !expected.is_empty()
            && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()));
        if !matches {
            debug!("Webhook API key mismatch");
            metrics::counter!("chirpy_auth_failures_total", "reason" => "api_key").increment(1);
            return Err(ApiError::unauthorized());
        }

        Ok(PolkaCaller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_debug() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
        };
        let debug_str = format!("{:?}", user);
        assert!(debug_str.contains("AuthUser"));
    }

    #[test]
    fn test_header_rejection_is_unauthorized() {
        let err = header_rejection(HeaderError::MissingHeader);
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
