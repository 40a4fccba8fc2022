//! Access token issuing and validation
//!
//! Access tokens are stateless HS256 JWTs carrying the user id as `sub`.
//! They cannot be revoked; a token stays valid until `exp`.
//! Keys are derived once from the server secret and shared through `Arc`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::MAX_ACCESS_TOKEN_TTL_SECS;

/// `iss` claim on every access token
pub const ISSUER: &str = "chirpy";

/// The only accepted signing algorithm
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Access token validation failures
///
/// The variants exist for logging only; callers answer every one of them
/// with the same 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a well-formed JWT")]
    Malformed,

    #[error("token signature or algorithm is invalid")]
    BadSignature,

    #[error("token was issued by someone else")]
    WrongIssuer,

    #[error("token has expired")]
    Expired,

    #[error("token subject is not a user id")]
    MalformedSubject,

    #[error("failed to sign token: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Short label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::WrongIssuer => "wrong_issuer",
            TokenError::Expired => "expired",
            TokenError::MalformedSubject => "malformed_subject",
            TokenError::Encoding(_) => "encoding",
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, always [`ISSUER`]
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for access token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    default_ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// `default_ttl_secs` is itself capped at one hour.
    pub fn new(secret: &[u8], default_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        // Expiry is checked against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let default_ttl = Duration::seconds(default_ttl_secs.clamp(0, MAX_ACCESS_TOKEN_TTL_SECS));

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            default_ttl,
        }
    }

    /// Lifetime to use for a requested `expires_in_seconds`
    ///
    /// Missing or non-positive requests get the default; anything above one
    /// hour is shortened to one hour.
    pub fn effective_ttl(&self, requested_secs: Option<i64>) -> Duration {
        // Clamp in seconds first: `Duration::seconds` panics on huge inputs.
        match requested_secs {
            Some(secs) if secs > 0 => Duration::seconds(secs.min(MAX_ACCESS_TOKEN_TTL_SECS)),
            _ => self.default_ttl,
        }
    }

    /// Default access token lifetime
    #[inline]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue an access token valid for `ttl` from now
    #[inline]
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(user_id, ttl, Utc::now())
    }

    /// Issue an access token as if the current time were `now`
    ///
    /// `ttl` is used as given; clamping is the caller's job.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, self.keys.encoding())
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validate an access token and return the user it was issued to
    #[inline]
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate an access token against an explicit clock
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidKeyFormat => TokenError::BadSignature,
                ErrorKind::InvalidIssuer => TokenError::WrongIssuer,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        let claims = token_data.claims;
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::MalformedSubject)
    }

    /// Get the pre-computed keys (for sharing)
    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }
}
