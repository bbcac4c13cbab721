//! Recording lifecycle and level metering.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::level::normalize_level;
use super::recorder::{AudioRecorder, SpeechBackend, transcribe_file};
use crate::{Error, Result};

/// Default metering poll period.
pub const METERING_INTERVAL: Duration = Duration::from_millis(100);

/// Whether the microphone is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// Not recording.
    #[default]
    Idle,
    /// Recording in progress.
    Recording,
}

/// How the last recording ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingOutcome {
    /// Stopped normally, leaving a file.
    Stopped(PathBuf),
    /// Cancelled, file discarded.
    Cancelled,
}

/// Drives one recorder through `Idle -> Recording -> Idle`.
///
/// While recording, the input level is sampled periodically and published
/// as a normalized value through [`levels`](Self::levels).
pub struct RecordingSession<R> {
    recorder: Arc<R>,
    state: RecordingState,
    outcome: Option<RecordingOutcome>,
    level: Arc<watch::Sender<f32>>,
    meter: Option<JoinHandle<()>>,
    poll: Duration,
}

impl<R> std::fmt::Debug for RecordingSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("state", &self.state)
            .field("outcome", &self.outcome)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl<R: AudioRecorder + 'static> RecordingSession<R> {
    /// Creates an idle session.
    #[must_use]
    pub fn new(recorder: Arc<R>) -> Self {
        let (level, _) = watch::channel(0.0);
        Self {
            recorder,
            state: RecordingState::Idle,
            outcome: None,
            level: Arc::new(level),
            meter: None,
            poll: METERING_INTERVAL,
        }
    }

    /// Sets the metering poll period.
    #[must_use]
    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RecordingState {
        self.state
    }

    /// How the last recording ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<&RecordingOutcome> {
        self.outcome.as_ref()
    }

    /// Subscribes to normalized input levels in `0.0..=1.0`.
    #[must_use]
    pub fn levels(&self) -> watch::Receiver<f32> {
        self.level.subscribe()
    }

    /// Starts recording.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if already recording,
    /// [`Error::PermissionDenied`] if the user refuses the microphone, or
    /// the recorder's error.
    pub async fn start(&mut self) -> Result<()> {
        if self.state == RecordingState::Recording {
            return Err(Error::InvalidState("already recording".into()));
        }
        if !self.recorder.request_permission().await {
            warn!("Microphone permission denied");
            return Err(Error::PermissionDenied);
        }

        self.recorder.start().await?;
        self.state = RecordingState::Recording;
        self.outcome = None;
        self.meter = Some(self.spawn_meter());
        info!("Recording started");
        Ok(())
    }

    /// Stops recording and returns the file.
    ///
    /// If the recorder fails to stop, the session stays in
    /// [`RecordingState::Recording`] so the caller can retry or cancel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if not recording, or the recorder's
    /// error.
    pub async fn stop(&mut self) -> Result<PathBuf> {
        self.ensure_recording()?;
        let path = self.recorder.stop().await?;
        self.halt();
        info!("Recording stopped: {}", path.display());
        self.outcome = Some(RecordingOutcome::Stopped(path.clone()));
        Ok(path)
    }

    /// Stops recording and discards the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if not recording, or the recorder's
    /// error.
    pub async fn cancel(&mut self) -> Result<()> {
        self.ensure_recording()?;
        self.recorder.cancel().await?;
        self.halt();
        info!("Recording cancelled");
        self.outcome = Some(RecordingOutcome::Cancelled);
        Ok(())
    }

    /// Stops recording, uploads the file and returns the recognized text.
    ///
    /// # Errors
    ///
    /// Returns an error if stopping, the upload or recognition fails.
    pub async fn stop_and_transcribe<S: SpeechBackend>(&mut self, speech: &S) -> Result<String> {
        let path = self.stop().await?;
        transcribe_file(speech, &path).await
    }

    fn ensure_recording(&self) -> Result<()> {
        if self.state == RecordingState::Recording {
            Ok(())
        } else {
            Err(Error::InvalidState("not recording".into()))
        }
    }

    fn halt(&mut self) {
        if let Some(meter) = self.meter.take() {
            meter.abort();
        }
        self.level.send_replace(0.0);
        self.state = RecordingState::Idle;
    }

    fn spawn_meter(&self) -> JoinHandle<()> {
        let recorder = Arc::clone(&self.recorder);
        let level = Arc::clone(&self.level);
        let poll = self.poll;

        tokio::spawn(async move {
            let mut ticker = interval(poll);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let db = recorder.metering_db().unwrap_or(f32::NEG_INFINITY);
                level.send_replace(normalize_level(db));
            }
        })
    }
}

impl<R> Drop for RecordingSession<R> {
    fn drop(&mut self) {
        if let Some(meter) = self.meter.take() {
            debug!("Recording session dropped while metering");
            meter.abort();
        }
    }
}
