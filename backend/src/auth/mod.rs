//! Authentication module
//!
//! Argon2 password hashing, stateless JWT access tokens, opaque
//! database-backed refresh tokens and `Authorization` header parsing.

mod header;
mod jwt;
mod middleware;
mod password;
mod refresh;

pub use header::{extract_api_key, extract_bearer, HeaderError, API_KEY_SCHEME, BEARER_SCHEME};
pub use jwt::{Claims, JwtService, TokenError, ISSUER};
pub use middleware::{AuthUser, BearerToken, PolkaCaller};
pub use password::{HashedCredential, PasswordError, PasswordService};
pub use refresh::{
    generate_refresh_token, IssuedRefreshToken, RefreshTokenError, RefreshTokenManager,
    REFRESH_TOKEN_BYTES,
};
