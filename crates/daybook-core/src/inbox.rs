//! Messages that arrive while the chat is not on screen.
//!
//! Replies and pushed conversations are queued in the store and counted as
//! unread until the chat is opened and takes them.

use tracing::debug;

use crate::Result;
use crate::chat::Message;
use crate::store::{KvStore, StorageKey};

/// Persistent queue of background messages plus the unread badge.
#[derive(Debug, Clone)]
pub struct Inbox {
    store: KvStore,
}

impl Inbox {
    /// Creates an inbox over the store.
    #[must_use]
    pub const fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Queues a single message and bumps the unread count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn push_message(&self, message: Message) -> Result<()> {
        let mut pending = self.pending_messages().await?;
        pending.push(message);
        self.store.set(StorageKey::PendingMessages, &pending).await?;
        self.add_unread(1).await
    }

    /// Queues a whole conversation and bumps the unread count by its length.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn push_conversation(&self, conversation: Vec<Message>) -> Result<()> {
        if conversation.is_empty() {
            return Ok(());
        }
        let added = u32::try_from(conversation.len()).unwrap_or(u32::MAX);
        let mut pending: Vec<Vec<Message>> = self
            .store
            .get(StorageKey::PendingConversations)
            .await?
            .unwrap_or_default();
        pending.push(conversation);
        self.store
            .set(StorageKey::PendingConversations, &pending)
            .await?;
        self.add_unread(added).await
    }

    /// Queued single messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn pending_messages(&self) -> Result<Vec<Message>> {
        Ok(self
            .store
            .get(StorageKey::PendingMessages)
            .await?
            .unwrap_or_default())
    }

    /// Removes and returns everything queued, conversations first, and
    /// resets the unread count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn take_all(&self) -> Result<Vec<Message>> {
        let conversations: Vec<Vec<Message>> = self
            .store
            .get(StorageKey::PendingConversations)
            .await?
            .unwrap_or_default();
        let mut taken: Vec<Message> = conversations.into_iter().flatten().collect();
        taken.extend(self.pending_messages().await?);

        self.store
            .remove_all(&[StorageKey::PendingConversations, StorageKey::PendingMessages])
            .await?;
        self.mark_read().await?;
        debug!("Took {} pending messages", taken.len());
        Ok(taken)
    }

    /// Current unread count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn unread_count(&self) -> Result<u32> {
        Ok(self
            .store
            .get(StorageKey::UnreadCount)
            .await?
            .unwrap_or_default())
    }

    /// Resets the unread count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn mark_read(&self) -> Result<()> {
        self.store.set(StorageKey::UnreadCount, &0u32).await
    }

    async fn add_unread(&self, n: u32) -> Result<()> {
        let count = self.unread_count().await?.saturating_add(n);
        self.store.set(StorageKey::UnreadCount, &count).await
    }
}
