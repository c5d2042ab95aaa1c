//! Error types for mealplan-identity — Railway Programming
//!
//! All fallible operations return `Result<T, IdentityError>`.
//! No panics, no unwraps in production code paths.

use thiserror::Error;

/// Unified error type for identity store and gate operations
#[derive(Error, Debug)]
pub enum IdentityError {
    // ─── Auth Errors ───

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not signed in")]
    NotSignedIn,

    // ─── Validation Errors ───

    #[error("Invalid plan duration: {0} weeks (expected 1-4)")]
    InvalidPlanDuration(u8),

    #[error("Invalid access level: {0}")]
    InvalidAccessLevel(String),

    // ─── Infrastructure Errors ───

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Actor unavailable: {0}")]
    ActorUnavailable(String),
}

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        IdentityError::Serialization(err.to_string())
    }
}

impl IdentityError {
    /// Errors the caller is expected to recover from locally
    /// (surfaced as a user-visible message rather than a failure page)
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Auth(_) | Self::NotSignedIn | Self::InvalidPlanDuration(_)
        )
    }
}

/// Result type alias for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;
