//! Chirpy Shared Library
//!
//! Wire types and content rules shared between the backend and any
//! client that speaks the Chirpy HTTP API.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
