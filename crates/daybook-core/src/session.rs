//! Chat inactivity tracking.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::Result;
use crate::store::{KvStore, StorageKey};
use crate::time::SharedClock;

/// Default inactivity window in minutes.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Tracks when the user last talked to the assistant.
///
/// Once the timeout passes without activity the conversation context is
/// stale and is dropped from the store.
pub struct SessionContext {
    clock: SharedClock,
    timeout: Duration,
    last_request: Mutex<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("timeout", &self.timeout)
            .field("last_request", &self.last_request())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Creates a context with no recorded activity.
    #[must_use]
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            timeout: Duration::minutes(DEFAULT_SESSION_TIMEOUT_MINUTES),
            last_request: Mutex::new(None),
        }
    }

    /// Sets the inactivity window.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The clock this context reads.
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// The inactivity window.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Records activity now.
    pub fn touch(&self) {
        let now = self.clock.now();
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(now);
    }

    /// Instant of the last recorded activity.
    #[must_use]
    pub fn last_request(&self) -> Option<DateTime<Utc>> {
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether more than the timeout has passed since the last activity.
    ///
    /// A context that was never touched is not expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.last_request()
            .is_some_and(|last| self.clock.now() - last > self.timeout)
    }

    /// Loads the last activity instant saved by a previous process.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn restore(&self, store: &KvStore) -> Result<()> {
        let saved: Option<DateTime<Utc>> = store.get(StorageKey::LastRequest).await?;
        if saved.is_some() {
            *self
                .last_request
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = saved;
        }
        Ok(())
    }

    /// Saves the last activity instant so the timeout spans processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn save(&self, store: &KvStore) -> Result<()> {
        match self.last_request() {
            Some(last) => store.set(StorageKey::LastRequest, &last).await,
            None => store.remove(StorageKey::LastRequest).await,
        }
    }

    /// Drops the stored conversation if the session expired.
    ///
    /// Returns `true` when something was cleared. The context is reset so
    /// the next request starts a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub async fn check_and_clear(&self, store: &KvStore) -> Result<bool> {
        if !self.is_expired() {
            return Ok(false);
        }

        store.remove_all(&StorageKey::SESSION).await?;
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        info!("Chat session expired, cleared history");
        Ok(true)
    }
}
