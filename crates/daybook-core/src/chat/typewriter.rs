//! Fixed-cadence text reveal.
//!
//! Replies are received in full before being shown. The typewriter then
//! reveals them one character per tick so the pace does not depend on the
//! network.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};

/// Default delay between two revealed characters.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(20);

/// Reveals a text one Unicode scalar at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset of the end of the visible prefix.
    cursor: usize,
}

impl Typewriter {
    /// Creates a typewriter with nothing revealed yet.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }

    /// Reveals one more character and returns the visible prefix.
    pub fn tick(&mut self) -> &str {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
        self.visible()
    }

    /// The currently visible prefix.
    #[must_use]
    pub fn visible(&self) -> &str {
        &self.text[..self.cursor]
    }

    /// The full text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether everything is visible.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.text.len()
    }

    /// Reveals the rest at once.
    pub fn skip(&mut self) -> &str {
        self.cursor = self.text.len();
        self.visible()
    }

    /// Drives the reveal to completion, one tick per `period`.
    ///
    /// `on_frame` sees every intermediate prefix. An empty text completes
    /// without waiting.
    pub async fn run(&mut self, period: Duration, mut on_frame: impl FnMut(&str)) {
        if self.is_done() {
            return;
        }
        if period.is_zero() {
            on_frame(self.skip());
            return;
        }

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        while !self.is_done() {
            ticker.tick().await;
            on_frame(self.tick());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_multibyte() {
        let mut tw = Typewriter::new("日记ok");
        assert_eq!(tw.visible(), "");
        assert_eq!(tw.tick(), "日");
        assert_eq!(tw.tick(), "日记");
        assert_eq!(tw.tick(), "日记o");
        assert!(!tw.is_done());
        assert_eq!(tw.tick(), "日记ok");
        assert!(tw.is_done());
        assert_eq!(tw.tick(), "日记ok");
    }

    #[test]
    fn test_skip() {
        let mut tw = Typewriter::new("hello");
        tw.tick();
        assert_eq!(tw.skip(), "hello");
        assert!(tw.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_paced() {
        let start = tokio::time::Instant::now();
        let mut frames = Vec::new();
        let mut tw = Typewriter::new("abc");
        tw.run(Duration::from_millis(20), |f| frames.push(f.to_string()))
            .await;

        assert_eq!(frames, vec!["a", "ab", "abc"]);
        assert_eq!(start.elapsed(), Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_empty_completes_immediately() {
        let start = tokio::time::Instant::now();
        let mut called = false;
        let mut tw = Typewriter::new("");
        tw.run(DEFAULT_INTERVAL, |_| called = true).await;

        assert!(!called);
        assert!(tw.is_done());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_run_zero_interval() {
        let mut frames = Vec::new();
        let mut tw = Typewriter::new("xyz");
        tw.run(Duration::ZERO, |f| frames.push(f.to_string())).await;
        assert_eq!(frames, vec!["xyz"]);
    }
}
