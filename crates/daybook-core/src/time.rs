//! Wall-clock abstraction for testability.
//!
//! Session expiry, the operation-card throttle and plan periods all depend
//! on "now". Code takes a [`Clock`] instead of calling `Utc::now()` so tests
//! can move time deterministically.
//!
//! # Example
//!
//! ```
//! use chrono::Duration;
//! use daybook_core::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::minutes(31));
//! assert_eq!(clock.now() - start, Duration::minutes(31));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};

/// Abstraction over wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current local wall-clock time, used for plan periods.
    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }

    /// Checks if a duration has elapsed since the given instant.
    fn has_elapsed(&self, since: DateTime<Utc>, duration: Duration) -> bool {
        self.now() - since >= duration
    }
}

/// System clock that uses real time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A mock clock for testing time-dependent code.
///
/// The clock starts at a base instant and only moves when told to.
#[derive(Debug)]
pub struct MockClock {
    /// Base instant.
    base: DateTime<Utc>,
    /// Offset from base in milliseconds.
    offset_millis: AtomicI64,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Creates a mock clock frozen at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a mock clock frozen at the given instant.
    #[must_use]
    pub const fn at(base: DateTime<Utc>) -> Self {
        Self {
            base,
            offset_millis: AtomicI64::new(0),
        }
    }

    /// Creates a mock clock that can be shared across tasks.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        self.offset_millis
            .fetch_add(duration.num_milliseconds(), Ordering::SeqCst);
    }

    /// Moves the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.offset_millis
            .store((instant - self.base).num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + Duration::milliseconds(self.offset_millis.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        self.as_ref().now()
    }
}

/// A shared clock for dynamic dispatch.
pub type SharedClock = Arc<dyn Clock>;
