//! Photo/voice upload and speech recognition.

use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::ApiClient;
use crate::error::{Error, Result};

/// Kind of media being uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A photo.
    Image,
    /// A voice recording.
    Audio,
}

impl MediaKind {
    const fn path(self) -> &'static str {
        match self {
            Self::Image => "api/upload/image",
            Self::Audio => "api/upload/audio",
        }
    }

    const fn fallback_type(self) -> &'static str {
        match self {
            Self::Image => "image/jpeg",
            Self::Audio => "audio/m4a",
        }
    }
}

/// Guesses a MIME type from the file extension.
#[must_use]
pub fn guess_content_type(path: &Path, kind: MediaKind) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("m4a") => "audio/m4a",
        Some("aac") => "audio/aac",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => kind.fallback_type(),
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AsrRequest<'a> {
    audio_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct AsrResponse {
    text: String,
}

impl ApiClient {
    /// Uploads a local file and returns its server URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the upload fails.
    pub async fn upload(&self, path: &Path, kind: MediaKind) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidConfig(format!("not a file path: {}", path.display())))?
            .to_string();

        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(guess_content_type(path, kind))?;
        let form = Form::new().part("file", part);

        let builder = self.request(Method::POST, kind.path())?.multipart(form);
        let response: UploadResponse = self.execute(builder, "upload url").await?;
        info!("Uploaded {} ({size} bytes) to {}", path.display(), response.url);
        Ok(response.url)
    }

    /// Uploads a photo.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the upload fails.
    pub async fn upload_image(&self, path: &Path) -> Result<String> {
        self.upload(path, MediaKind::Image).await
    }

    /// Uploads a voice recording.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the upload fails.
    pub async fn upload_audio(&self, path: &Path) -> Result<String> {
        self.upload(path, MediaKind::Audio).await
    }

    /// Runs speech recognition on an uploaded recording.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn transcribe(&self, audio_url: &str) -> Result<String> {
        let builder = self
            .request(Method::POST, "api/asr")?
            .json(&AsrRequest { audio_url });
        let response: AsrResponse = self.execute(builder, "transcript").await?;
        Ok(response.text)
    }
}
