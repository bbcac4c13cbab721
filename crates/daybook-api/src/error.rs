//! Error types for backend API calls.

use std::io;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error (reading an upload from disk).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status line.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The server answered with a non-success envelope code.
    #[error("API error {code}: {message}")]
    Api {
        /// Envelope code.
        code: i64,
        /// Human-readable message from the server.
        message: String,
    },

    /// A success envelope arrived without the expected `data`.
    #[error("Response is missing {0}")]
    MissingData(&'static str),

    /// The token stream could not be decoded.
    #[error("Stream error: {0}")]
    Stream(#[from] daybook_stream::Error),

    /// The server reported a failure inside the token stream.
    #[error("Server stream error: {0}")]
    StreamAborted(String),

    /// The token stream ended before any text or `[DONE]` arrived.
    #[error("Stream ended unexpectedly")]
    UnexpectedEof,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// Creates an API error from an envelope code and message.
    #[must_use]
    pub fn api_error(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Returns true if the server rejected the caller's credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Status { status: 401, .. } | Self::Api { code: 401, .. }
        )
    }
}
