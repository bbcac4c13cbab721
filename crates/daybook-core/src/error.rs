//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] daybook_api::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential storage error.
    #[error("Credential error: {0}")]
    Credential(#[from] crate::credentials::CredentialError),

    /// A chat message is already being sent.
    #[error("A message is already being sent")]
    SendInFlight,

    /// The user refused microphone access.
    #[error("Microphone permission denied")]
    PermissionDenied,

    /// Operation not valid in the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// No signed-in user, neither from the server nor cached.
    #[error("Not logged in")]
    NotLoggedIn,
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
