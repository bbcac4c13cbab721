//! Backend calls used by the chat session.

use std::future::Future;
use std::path::Path;

use tracing::trace;

use daybook_api::{ApiClient, HistoryEntry, Result};

/// Chat, vision and diary-generation calls.
///
/// Streaming replies are returned whole; the session paces the reveal
/// itself.
pub trait ChatBackend: Send + Sync {
    /// Sends a chat turn and returns the full reply.
    fn chat(
        &self,
        user_id: i64,
        content: &str,
        history: &[HistoryEntry],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Stores a finished exchange for analytics.
    fn save_chat_record(
        &self,
        user_id: i64,
        user_content: &str,
        assistant_content: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Uploads an image and returns its URL.
    fn upload_image(&self, path: &Path) -> impl Future<Output = Result<String>> + Send;

    /// Describes an uploaded image.
    fn understand_image(
        &self,
        user_id: i64,
        image_url: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Generates a diary from a conversation and returns its text.
    fn generate_diary(
        &self,
        user_id: i64,
        conversation: &[HistoryEntry],
    ) -> impl Future<Output = Result<String>> + Send;
}

impl ChatBackend for ApiClient {
    fn chat(
        &self,
        user_id: i64,
        content: &str,
        history: &[HistoryEntry],
    ) -> impl Future<Output = Result<String>> + Send {
        Self::chat(self, user_id, content, history, |token| {
            trace!("chat token: {token:?}");
        })
    }

    fn save_chat_record(
        &self,
        user_id: i64,
        user_content: &str,
        assistant_content: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        Self::save_chat_record(self, user_id, user_content, assistant_content)
    }

    fn upload_image(&self, path: &Path) -> impl Future<Output = Result<String>> + Send {
        Self::upload_image(self, path)
    }

    fn understand_image(
        &self,
        user_id: i64,
        image_url: &str,
    ) -> impl Future<Output = Result<String>> + Send {
        Self::understand_image(self, user_id, image_url)
    }

    fn generate_diary(
        &self,
        user_id: i64,
        conversation: &[HistoryEntry],
    ) -> impl Future<Output = Result<String>> + Send {
        Self::generate_diary(self, user_id, conversation, |token| {
            trace!("diary token: {token:?}");
        })
    }
}
