//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Webhook event that upgrades a user to Chirpy Red
pub const POLKA_USER_UPGRADED: &str = "user.upgraded";

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Users and Sessions
// ============================================================================

/// Account creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// Email/password replacement request (requires an access token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime. Longer values are clamped to one hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

/// Successful login: the user plus both session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Signed access token
    pub token: String,
    /// Opaque refresh token
    pub refresh_token: String,
}

/// Response to `POST /api/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

// ============================================================================
// Chirps
// ============================================================================

/// Chirp creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Chirp response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

// ============================================================================
// Polka Webhooks
// ============================================================================

/// Payment provider webhook payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolkaWebhookRequest {
    pub event: String,
    pub data: PolkaWebhookData,
}

/// Webhook payload data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolkaWebhookData {
    /// Kept as a string so a malformed id can be reported as a 400
    pub user_id: String,
}
