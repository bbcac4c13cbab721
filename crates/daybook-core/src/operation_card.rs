//! Throttle for the promotional operation card.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::Result;
use crate::store::{KvStore, StorageKey};

/// Default minimum gap between two displays, in minutes.
pub const DEFAULT_INTERVAL_MINUTES: i64 = 30;

/// Decides whether the operation card may be shown.
#[derive(Debug, Clone)]
pub struct OperationCard {
    store: KvStore,
    interval: Duration,
}

impl OperationCard {
    /// Creates a throttle with the default interval.
    #[must_use]
    pub fn new(store: KvStore) -> Self {
        Self {
            store,
            interval: Duration::minutes(DEFAULT_INTERVAL_MINUTES),
        }
    }

    /// Sets the minimum gap between displays.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether the card may be shown at `now`.
    ///
    /// True if it was never shown or the interval has passed since.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn should_show(&self, now: DateTime<Utc>) -> Result<bool> {
        let last: Option<DateTime<Utc>> = self.store.get(StorageKey::OperationCardLastShown).await?;
        let show = last.is_none_or(|last| now - last >= self.interval);
        debug!("Operation card last shown {last:?}, show={show}");
        Ok(show)
    }

    /// Records that the card was shown at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn mark_shown(&self, now: DateTime<Utc>) -> Result<()> {
        self.store.set(StorageKey::OperationCardLastShown, &now).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 12, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn test_throttle() {
        let card = OperationCard::new(KvStore::in_memory().await.unwrap());
        assert!(card.should_show(at(0)).await.unwrap());

        card.mark_shown(at(0)).await.unwrap();
        assert!(!card.should_show(at(1)).await.unwrap());
        assert!(!card.should_show(at(29)).await.unwrap());
        assert!(card.should_show(at(30)).await.unwrap());
    }

    #[tokio::test]
    async fn test_custom_interval() {
        let card =
            OperationCard::new(KvStore::in_memory().await.unwrap()).with_interval(Duration::minutes(5));
        card.mark_shown(at(0)).await.unwrap();
        assert!(!card.should_show(at(4)).await.unwrap());
        assert!(card.should_show(at(5)).await.unwrap());
    }
}
