//! Sign-in state.
//!
//! The server is the source of truth for the current user, but the app must
//! stay usable offline: when the server cannot be reached (or rejects the
//! request) the last cached user is used instead.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use daybook_api::{ApiClient, LoginResponse, User};

use crate::credentials::TokenStore;
use crate::store::{KvStore, StorageKey};
use crate::{Error, Result};

/// Backend calls needed for authentication.
pub trait AuthBackend: Send + Sync {
    /// Exchanges credentials for a user and bearer token.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = daybook_api::Result<LoginResponse>> + Send;

    /// Fetches the user the current token belongs to.
    fn current_user(&self) -> impl Future<Output = daybook_api::Result<User>> + Send;
}

impl AuthBackend for ApiClient {
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = daybook_api::Result<LoginResponse>> + Send {
        Self::login(self, username, password)
    }

    fn current_user(&self) -> impl Future<Output = daybook_api::Result<User>> + Send {
        Self::current_user(self)
    }
}

/// Login, session check and logout over a backend, the local cache and the
/// token store.
pub struct AuthService<B> {
    backend: B,
    store: KvStore,
    tokens: Arc<dyn TokenStore>,
}

impl<B: AuthBackend> AuthService<B> {
    /// Creates a new auth service.
    pub fn new(backend: B, store: KvStore, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            store,
            tokens,
        }
    }

    /// The backend this service calls.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Signs in, caching the user and storing the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials or the cache
    /// or token store cannot be written.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let response = self.backend.login(username, password).await?;
        self.tokens.store(&response.token)?;
        if let Err(e) = self.store.set(StorageKey::AuthUser, &response.user).await {
            if let Err(clear) = self.tokens.clear() {
                warn!("Could not roll back session token: {clear}");
            }
            return Err(e);
        }
        info!("Signed in as {}", response.user.username);
        Ok(response)
    }

    /// Returns the current user, preferring the server.
    ///
    /// Any server error falls back to the cached user. `None` means there is
    /// no signed-in user at all.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local cache cannot be read or written.
    pub async fn check_auth(&self) -> Result<Option<User>> {
        match self.backend.current_user().await {
            Ok(user) => {
                self.store.set(StorageKey::AuthUser, &user).await?;
                Ok(Some(user))
            }
            Err(e) => {
                warn!("User check failed, using cached user: {e}");
                self.cached_user().await
            }
        }
    }

    /// Like [`check_auth`](Self::check_auth), but a missing user is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] if there is no user.
    pub async fn require_user(&self) -> Result<User> {
        self.check_auth().await?.ok_or(Error::NotLoggedIn)
    }

    /// The cached user without asking the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    pub async fn cached_user(&self) -> Result<Option<User>> {
        self.store.get(StorageKey::AuthUser).await
    }

    /// The stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.tokens.load()?)
    }

    /// Forgets the cached user and the token.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be cleared.
    pub async fn logout(&self) -> Result<()> {
        self.store.remove(StorageKey::AuthUser).await?;
        self.tokens.clear()?;
        info!("Signed out");
        Ok(())
    }
}
