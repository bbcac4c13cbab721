//! Platform seams for voice notes.

use std::future::Future;
use std::path::{Path, PathBuf};

use daybook_api::ApiClient;

use crate::Result;

/// Device microphone.
///
/// Implementations wrap the platform recorder. Only one recording is active
/// at a time; the session enforces the ordering of calls.
pub trait AudioRecorder: Send + Sync {
    /// Asks for microphone access. `false` means the user refused.
    fn request_permission(&self) -> impl Future<Output = bool> + Send;

    /// Starts recording to a new file.
    fn start(&self) -> impl Future<Output = Result<()>> + Send;

    /// Current input level in dBFS, if the recorder reports one.
    fn metering_db(&self) -> Option<f32>;

    /// Stops recording and returns the finished file.
    fn stop(&self) -> impl Future<Output = Result<PathBuf>> + Send;

    /// Stops recording and discards the file.
    fn cancel(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Upload and speech recognition calls.
pub trait SpeechBackend: Send + Sync {
    /// Uploads an audio file and returns its URL.
    fn upload_audio(&self, path: &Path) -> impl Future<Output = daybook_api::Result<String>> + Send;

    /// Recognizes speech in an uploaded file.
    fn transcribe(&self, audio_url: &str) -> impl Future<Output = daybook_api::Result<String>> + Send;
}

impl SpeechBackend for ApiClient {
    fn upload_audio(&self, path: &Path) -> impl Future<Output = daybook_api::Result<String>> + Send {
        Self::upload_audio(self, path)
    }

    fn transcribe(&self, audio_url: &str) -> impl Future<Output = daybook_api::Result<String>> + Send {
        Self::transcribe(self, audio_url)
    }
}

/// Uploads an audio file and returns the recognized text.
///
/// # Errors
///
/// Returns an error if the upload or recognition fails.
pub async fn transcribe_file<S: SpeechBackend>(speech: &S, path: &Path) -> Result<String> {
    let url = speech.upload_audio(path).await?;
    let text = speech.transcribe(&url).await?;
    tracing::debug!("Transcribed {} ({} chars)", path.display(), text.chars().count());
    Ok(text)
}
