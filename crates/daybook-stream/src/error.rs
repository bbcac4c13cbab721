//! Error types for stream decoding.

use std::str::Utf8Error;

/// Result type alias for stream decoding.
pub type Result<T> = std::result::Result<T, Error>;

/// Stream decoding error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A line was not valid UTF-8.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] Utf8Error),

    /// A line grew past the decoder's limit without a newline.
    #[error("line too long: {0} bytes (max {1})")]
    LineTooLong(usize, usize),
}
