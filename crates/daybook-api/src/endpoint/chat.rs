//! Chat and image-understanding endpoints.

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{ChatRecordRequest, ChatRequest, HistoryEntry, VisionRequest, VisionResponse};

impl ApiClient {
    /// Sends a chat turn and streams the assistant's reply.
    ///
    /// `on_token` sees each token as it arrives; the full reply is returned
    /// once the server sends `[DONE]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server aborts the stream.
    pub async fn chat(
        &self,
        user_id: i64,
        user_content: &str,
        history: &[HistoryEntry],
        on_token: impl FnMut(&str),
    ) -> Result<String> {
        let body = ChatRequest {
            user_content,
            assistant_history: history,
            user_id,
        };
        debug!("Chat request with {} history turns", history.len());
        let builder = self.request(Method::POST, "api/chat")?.json(&body);
        self.execute_stream(builder, on_token).await
    }

    /// Stores a finished exchange for analytics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Callers usually ignore it.
    pub async fn save_chat_record(
        &self,
        user_id: i64,
        user_content: &str,
        assistant_content: &str,
    ) -> Result<()> {
        let body = ChatRecordRequest {
            user_id,
            user_content,
            assistant_content,
        };
        let builder = self.request(Method::POST, "api/chat/record")?.json(&body);
        self.execute_unit(builder).await
    }

    /// Asks the vision model to describe an uploaded image.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no content.
    pub async fn understand_image(&self, user_id: i64, image_url: &str) -> Result<String> {
        let body = VisionRequest { image_url, user_id };
        let builder = self.request(Method::POST, "api/vl")?.json(&body);
        let response: VisionResponse = self.execute(builder, "image description").await?;
        Ok(response.content)
    }
}
