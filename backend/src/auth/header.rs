//! `Authorization` header parsing
//!
//! Two schemes share the header: `Bearer <token>` for user sessions and
//! `ApiKey <key>` for the payment provider webhook. The scheme keyword is
//! matched case-insensitively, must be followed by a space, and the
//! credential is trimmed.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

/// Session scheme keyword
pub const BEARER_SCHEME: &str = "Bearer";

/// Trusted-caller scheme keyword
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Header parsing failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[error("no authorization header found")]
    MissingHeader,

    #[error("authorization header does not use the {0} scheme")]
    MissingScheme(&'static str),

    #[error("authorization header carries an empty credential")]
    EmptyCredential,
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, HeaderError> {
    extract_scheme(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, HeaderError> {
    extract_scheme(headers, API_KEY_SCHEME)
}

fn extract_scheme<'a>(headers: &'a HeaderMap, scheme: &'static str) -> Result<&'a str, HeaderError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(HeaderError::MissingHeader)?;

    // Non-visible ASCII cannot carry either scheme.
    let value = value
        .to_str()
        .map_err(|_| HeaderError::MissingScheme(scheme))?;

    strip_scheme(value, scheme)
}

/// Split `<scheme> <credential>` and return the trimmed credential
///
/// The byte after the keyword must be a space; whitespace around the
/// credential is dropped.
fn strip_scheme<'a>(value: &'a str, scheme: &'static str) -> Result<&'a str, HeaderError> {
    let keyword = value
        .get(..scheme.len())
        .filter(|keyword| keyword.eq_ignore_ascii_case(scheme))
        .ok_or(HeaderError::MissingScheme(scheme))?;

    let rest = &value[keyword.len()..];
    if !rest.starts_with(' ') {
        return Err(HeaderError::MissingScheme(scheme));
    }

    let credential = rest.trim();
    if credential.is_empty() {
        return Err(HeaderError::EmptyCredential);
    }

    Ok(credential)
}
