//! Error types for the Chirpy application

use thiserror::Error;

/// Content validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Chirp is too long")]
    ChirpTooLong { length: usize, max: usize },

    #[error("Chirp cannot be empty")]
    EmptyChirp,
}
