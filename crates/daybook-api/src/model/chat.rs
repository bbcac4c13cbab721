//! Chat request DTOs.

use serde::{Deserialize, Serialize};

/// Speaker of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person writing the diary.
    User,
    /// The AI companion.
    Assistant,
}

/// One turn of conversation sent back to the model as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Speaker.
    pub role: Role,
    /// Text of the turn.
    pub content: String,
}

impl HistoryEntry {
    /// A user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequest<'a> {
    pub user_content: &'a str,
    pub assistant_history: &'a [HistoryEntry],
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRecordRequest<'a> {
    pub user_id: i64,
    pub user_content: &'a str,
    pub assistant_content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VisionRequest<'a> {
    pub image_url: &'a str,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VisionResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiaryGenerateRequest<'a> {
    pub user_id: i64,
    pub conversation: &'a [HistoryEntry],
}
