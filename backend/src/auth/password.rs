//! Password hashing using argon2
//!
//! Provides salted, memory-hard password hashing and constant-time verification.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Async callers should use the
//! `*_async` variants, which run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;
use thiserror::Error;

/// Errors produced by the credential hasher
#[derive(Error, Debug)]
pub enum PasswordError {
    /// The stored hash could not be parsed. This is a data-integrity problem,
    /// not a wrong password.
    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A self-describing PHC hash string (algorithm, params, salt and digest).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedCredential(String);

impl HashedCredential {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for HashedCredential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Never print the digest.
impl fmt::Debug for HashedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedCredential(..)")
    }
}

/// Password hashing service
///
/// Uses Argon2id which is the recommended variant for password hashing.
/// It provides resistance against both side-channel and GPU-based attacks.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    ///
    /// # Performance Note
    /// This is CPU-intensive. For async contexts, use `hash_async`.
    pub fn hash(password: &str) -> Result<HashedCredential, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(HashedCredential(hash.to_string()))
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(password: String) -> Result<HashedCredential, PasswordError> {
        tokio::task::spawn_blocking(move || Self::hash(&password)).await?
    }

    /// Verify a password against a hash (blocking operation)
    ///
    /// Returns `Ok(false)` for a wrong password and `Err(MalformedHash)`
    /// when the stored value cannot be parsed. Parameters and salt are read
    /// from the hash itself.
    pub fn verify(password: &str, hashed: &HashedCredential) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hashed.as_str())
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool.
    pub async fn verify_async(
        password: String,
        hashed: HashedCredential,
    ) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hashed)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correctPassword123!";
        let hash = PasswordService::hash(password).unwrap();

        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrongPassword", &hash).unwrap());
        assert!(!PasswordService::verify("", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_self_describing() {
        let hash = PasswordService::hash("anotherPassword456!").unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "test_password";
        let hash1 = PasswordService::hash(password).unwrap();
        let hash2 = PasswordService::hash(password).unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        assert!(PasswordService::verify(password, &hash1).unwrap());
        assert!(PasswordService::verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_password_does_not_match_other_hash() {
        let hash = PasswordService::hash("anotherPassword456!").unwrap();
        assert!(!PasswordService::verify("correctPassword123!", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let corrupted = HashedCredential::from("invalidhash".to_string());
        let result = PasswordService::verify("correctPassword123!", &corrupted);
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_debug_hides_digest() {
        let hash = PasswordService::hash("secret").unwrap();
        assert_eq!(format!("{:?}", hash), "HashedCredential(..)");
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = PasswordService::hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password.clone(), hash.clone())
            .await
            .unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash)
            .await
            .unwrap());
    }

    proptest! {
        // Argon2 is deliberately slow; keep the case count small.
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_hash_then_verify_accepts(password in "\\PC{0,32}") {
            let hash = PasswordService::hash(&password).unwrap();
            prop_assert!(PasswordService::verify(&password, &hash).unwrap());
        }

        #[test]
        fn prop_distinct_password_rejected(a in "[a-zA-Z0-9]{1,24}", b in "[a-zA-Z0-9]{1,24}") {
            prop_assume!(a != b);
            let hash = PasswordService::hash(&b).unwrap();
            prop_assert!(!PasswordService::verify(&a, &hash).unwrap());
        }
    }
}
