//! Secure storage for the session token.
//!
//! The bearer token returned by login lives in the platform's native
//! credential storage rather than the plain key-value cache:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use std::sync::Mutex;

use keyring::Entry;
use tracing::debug;

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "daybook";

/// Keyring user name for the bearer token.
const TOKEN_CREDENTIAL: &str = "session_token";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// In-memory store lock was poisoned.
    #[error("Token store lock poisoned")]
    Poisoned,
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Where the session token is kept.
pub trait TokenStore: Send + Sync {
    /// Stores the token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn store(&self, token: &str) -> CredentialResult<()>;

    /// Loads the token, `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn load(&self) -> CredentialResult<Option<String>>;

    /// Removes the token. Missing tokens are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn clear(&self) -> CredentialResult<()>;
}

/// Token store backed by the system keyring.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry() -> CredentialResult<Entry> {
        Ok(Entry::new(SERVICE_NAME, TOKEN_CREDENTIAL)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn store(&self, token: &str) -> CredentialResult<()> {
        Self::entry()?.set_password(token)?;
        debug!("Stored session token in keyring");
        Ok(())
    }

    fn load(&self) -> CredentialResult<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => {
                debug!("No session token in keyring");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> CredentialResult<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) => {
                debug!("Deleted session token from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Token store kept in process memory, for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn store(&self, token: &str) -> CredentialResult<()> {
        *self.token.lock().map_err(|_| CredentialError::Poisoned)? = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> CredentialResult<Option<String>> {
        Ok(self
            .token
            .lock()
            .map_err(|_| CredentialError::Poisoned)?
            .clone())
    }

    fn clear(&self) -> CredentialResult<()> {
        *self.token.lock().map_err(|_| CredentialError::Poisoned)? = None;
        Ok(())
    }
}
