//! Keys of the local key-value cache.

/// Every value the client persists locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Cached signed-in user.
    AuthUser,
    /// Messages that arrived while the chat screen was not showing.
    PendingMessages,
    /// Whole conversations that arrived in the background.
    PendingConversations,
    /// Turns sent back to the model as context.
    AssistantHistory,
    /// Unread badge counter.
    UnreadCount,
    /// When the operation card was last shown.
    OperationCardLastShown,
    /// Last chat activity, for the inactivity timeout.
    LastRequest,
}

impl StorageKey {
    /// All keys.
    pub const ALL: [Self; 7] = [
        Self::AuthUser,
        Self::PendingMessages,
        Self::PendingConversations,
        Self::AssistantHistory,
        Self::UnreadCount,
        Self::OperationCardLastShown,
        Self::LastRequest,
    ];

    /// Keys cleared when the chat session times out.
    pub const SESSION: [Self; 4] = [
        Self::AssistantHistory,
        Self::PendingMessages,
        Self::PendingConversations,
        Self::LastRequest,
    ];

    /// Convert to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AuthUser => "auth_user",
            Self::PendingMessages => "pending_messages",
            Self::PendingConversations => "pending_conversations",
            Self::AssistantHistory => "assistant_history",
            Self::UnreadCount => "unread_count",
            Self::OperationCardLastShown => "operation_card_last_shown",
            Self::LastRequest => "last_request",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
