//! Chat transcript entries.

use serde::{Deserialize, Serialize};

use daybook_api::{DiaryDetail, Plan};

/// Who a transcript entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Typed or attached by the user.
    User,
    /// Produced by the assistant.
    System,
}

/// What a system message carries beyond plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// A generated diary.
    Diary,
    /// Plans suggested by the assistant.
    Plan,
    /// A transcribed voice note.
    Voice,
    /// An image description.
    Image,
    /// Any type this client does not know.
    #[serde(other)]
    Other,
}

impl RecordType {
    /// Convert to wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Diary => "diary",
            Self::Plan => "plan",
            Self::Voice => "voice",
            Self::Image => "image",
            Self::Other => "other",
        }
    }
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Id unique within the session.
    pub id: u64,
    /// Sender.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Visible text. Grows while a reply is being revealed.
    pub text: String,
    /// Attached image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the text is still being revealed.
    #[serde(default)]
    pub is_streaming: bool,
    /// Structured payload type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
    /// Generated diary, for diary records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diary_data: Option<DiaryDetail>,
    /// Suggested plans, for plan records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plans: Option<Vec<Plan>>,
}

impl Message {
    /// A user text message.
    #[must_use]
    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            kind: MessageKind::User,
            text: text.into(),
            image_url: None,
            is_streaming: false,
            record_type: None,
            diary_data: None,
            plans: None,
        }
    }

    /// A user message carrying an image.
    #[must_use]
    pub fn user_image(id: u64, image_url: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..Self::user(id, String::new())
        }
    }

    /// An empty assistant message that is about to be revealed.
    #[must_use]
    pub fn placeholder(id: u64) -> Self {
        Self {
            kind: MessageKind::System,
            is_streaming: true,
            ..Self::user(id, String::new())
        }
    }

    /// Tags the message with a record type.
    #[must_use]
    pub const fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    /// Whether the user sent this message.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let msg = Message::placeholder(3).with_record_type(RecordType::Diary);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["isStreaming"], true);
        assert_eq!(json["recordType"], "diary");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_decode_minimal_and_unknown_record_type() {
        let msg: Message =
            serde_json::from_str(r#"{"id":1,"type":"system","text":"hi","recordType":"poll"}"#)
                .unwrap();
        assert_eq!(msg.kind, MessageKind::System);
        assert!(!msg.is_streaming);
        assert_eq!(msg.record_type, Some(RecordType::Other));
    }

    #[test]
    fn test_user_image() {
        let msg = Message::user_image(2, "https://cdn/x.jpg");
        assert!(msg.is_user());
        assert!(msg.text.is_empty());
        assert_eq!(msg.image_url.as_deref(), Some("https://cdn/x.jpg"));
    }
}
