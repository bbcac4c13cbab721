//! The `{code, data, msg}` wrapper around every non-streaming response.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Envelope codes the backend uses for success.
const SUCCESS_CODES: [i64; 2] = [0, 200];

/// Response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Status code (0 or 200 on success).
    pub code: i64,
    /// Payload.
    pub data: Option<T>,
    /// Error or info message.
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Returns true if the code means success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        SUCCESS_CODES.contains(&self.code)
    }

    /// Converts into the payload, or an [`Error::Api`] for failure codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not a success code.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::api_error(
                self.code,
                self.msg.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}
