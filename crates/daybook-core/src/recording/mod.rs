//! Voice notes: recording lifecycle, level metering and transcription.

mod level;
mod recorder;
mod session;

pub use level::{SILENCE_DB, normalize_level};
pub use recorder::{AudioRecorder, SpeechBackend, transcribe_file};
pub use session::{METERING_INTERVAL, RecordingOutcome, RecordingSession, RecordingState};
