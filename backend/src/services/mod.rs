//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the authentication primitives and the storage collaborators.

pub mod chirp;
pub mod session;
pub mod user;

pub use chirp::ChirpService;
pub use session::SessionService;
pub use user::{UserService, WebhookOutcome};
