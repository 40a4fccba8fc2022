//! Chirp content validation
//!
//! Length limits and the profanity filter applied before a chirp is stored.

use crate::errors::ValidationError;

/// Maximum chirp length in characters
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words replaced by [`CENSORED`] when they appear as a whole word
pub const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Replacement for a profane word
pub const CENSORED: &str = "****";

/// Validate a chirp body and return the cleaned text
pub fn validate_chirp(body: &str) -> Result<String, ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyChirp);
    }

    let length = body.chars().count();
    if length > MAX_CHIRP_LENGTH {
        return Err(ValidationError::ChirpTooLong {
            length,
            max: MAX_CHIRP_LENGTH,
        });
    }

    Ok(sanitize_chirp(body))
}

/// Replace profane words, matching case-insensitively on single-space boundaries.
///
/// Punctuation attached to a word prevents the match ("Sharbert!" is kept).
pub fn sanitize_chirp(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
