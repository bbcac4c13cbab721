//! Chat session: transcript, send guard and reply reveal.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info};

use daybook_api::HistoryEntry;

use super::backend::ChatBackend;
use super::message::{Message, RecordType};
use super::typewriter::{DEFAULT_INTERVAL, Typewriter};
use crate::session::SessionContext;
use crate::store::{KvStore, StorageKey};
use crate::{Error, Result};

/// Maximum number of history turns sent back as context.
pub const MAX_HISTORY: usize = 40;

#[derive(Debug, Default)]
struct ChatState {
    messages: Vec<Message>,
    history: Vec<HistoryEntry>,
    next_id: u64,
}

impl ChatState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn find_mut(&mut self, id: u64) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    fn remove(&mut self, id: u64) {
        self.messages.retain(|m| m.id != id);
    }

    fn record_exchange(&mut self, user: String, assistant: String) {
        self.history.push(HistoryEntry::user(user));
        self.history.push(HistoryEntry::assistant(assistant));
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }
}

/// Clears the in-flight flag when dropped, even if the send is cancelled.
struct SendGuard<'a>(&'a AtomicBool);

impl<'a> SendGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::SendInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One conversation with the assistant.
///
/// Only one request may be in flight at a time; a second `send` while the
/// first is pending fails with [`Error::SendInFlight`] instead of queueing.
pub struct ChatSession<B> {
    backend: B,
    user_id: i64,
    context: Arc<SessionContext>,
    store: Option<KvStore>,
    interval: Duration,
    state: Mutex<ChatState>,
    sending: AtomicBool,
}

impl<B> std::fmt::Debug for ChatSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("user_id", &self.user_id)
            .field("interval", &self.interval)
            .field("sending", &self.sending)
            .finish_non_exhaustive()
    }
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates an empty session for a user.
    pub fn new(backend: B, user_id: i64, context: Arc<SessionContext>) -> Self {
        Self {
            backend,
            user_id,
            context,
            store: None,
            interval: DEFAULT_INTERVAL,
            state: Mutex::new(ChatState::default()),
            sending: AtomicBool::new(false),
        }
    }

    /// Persists the assistant history to the given store.
    #[must_use]
    pub fn with_store(mut self, store: KvStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the typewriter delay per character.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Loads the stored assistant history, unless the session expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn restore(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        self.context.restore(store).await?;
        if self.context.check_and_clear(store).await? {
            return Ok(());
        }
        let history: Vec<HistoryEntry> = store
            .get(StorageKey::AssistantHistory)
            .await?
            .unwrap_or_default();
        debug!("Restored {} history turns", history.len());
        self.state().history = history;
        Ok(())
    }

    /// Snapshot of the transcript.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    /// Snapshot of the history sent as context.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state().history.clone()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    /// Appends messages that arrived while the session was not showing.
    ///
    /// They get fresh ids in this session.
    pub fn absorb(&self, messages: impl IntoIterator<Item = Message>) {
        let mut state = self.state();
        for mut message in messages {
            message.id = state.next_id();
            message.is_streaming = false;
            state.push(message);
        }
    }

    /// Sends a text message and reveals the reply.
    ///
    /// `on_frame` sees each revealed prefix of the reply. Returns the full
    /// reply text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SendInFlight`] if another send is pending, or the
    /// backend error. On error the reply placeholder is removed.
    pub async fn send(&self, text: &str, on_frame: impl FnMut(&str)) -> Result<String> {
        let _guard = SendGuard::acquire(&self.sending)?;
        self.expire_if_idle().await?;

        let (placeholder, history) = {
            let mut state = self.state();
            let user_id = state.next_id();
            state.push(Message::user(user_id, text));
            let placeholder = state.next_id();
            state.push(Message::placeholder(placeholder));
            (placeholder, state.history.clone())
        };

        let reply = match self.backend.chat(self.user_id, text, &history).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(placeholder, e.into())),
        };

        self.reveal(placeholder, &reply, on_frame).await;
        self.state().record_exchange(text.to_string(), reply.clone());
        self.persist_history().await?;
        self.touch().await?;

        if let Err(e) = self
            .backend
            .save_chat_record(self.user_id, text, &reply)
            .await
        {
            debug!("Chat record not saved: {e}");
        }

        info!("Chat reply received ({} chars)", reply.chars().count());
        Ok(reply)
    }

    /// Uploads an image, asks the assistant about it and reveals the answer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SendInFlight`] if another send is pending, or the
    /// upload or vision error.
    pub async fn send_image(&self, path: &Path, on_frame: impl FnMut(&str)) -> Result<String> {
        let _guard = SendGuard::acquire(&self.sending)?;
        self.expire_if_idle().await?;

        let url = self.backend.upload_image(path).await.map_err(|e| {
            error!("Image upload failed: {e}");
            Error::from(e)
        })?;

        let placeholder = {
            let mut state = self.state();
            let id = state.next_id();
            state.push(Message::user_image(id, url.clone()));
            let placeholder = state.next_id();
            state.push(Message::placeholder(placeholder).with_record_type(RecordType::Image));
            placeholder
        };

        let description = match self.backend.understand_image(self.user_id, &url).await {
            Ok(description) => description,
            Err(e) => return Err(self.fail(placeholder, e.into())),
        };

        self.reveal(placeholder, &description, on_frame).await;
        self.state().record_exchange(url, description.clone());
        self.persist_history().await?;
        self.touch().await?;
        Ok(description)
    }

    /// Turns the conversation so far into a diary and reveals its text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if there is nothing to summarize,
    /// [`Error::SendInFlight`] if another send is pending, or the backend
    /// error.
    pub async fn generate_diary(&self, on_frame: impl FnMut(&str)) -> Result<String> {
        let _guard = SendGuard::acquire(&self.sending)?;

        let (placeholder, conversation) = {
            let mut state = self.state();
            if state.history.is_empty() {
                return Err(Error::InvalidState("no conversation to summarize".into()));
            }
            let placeholder = state.next_id();
            state.push(Message::placeholder(placeholder).with_record_type(RecordType::Diary));
            (placeholder, state.history.clone())
        };

        let diary = match self
            .backend
            .generate_diary(self.user_id, &conversation)
            .await
        {
            Ok(diary) => diary,
            Err(e) => return Err(self.fail(placeholder, e.into())),
        };

        self.reveal(placeholder, &diary, on_frame).await;
        self.touch().await?;
        info!("Diary generated from {} turns", conversation.len());
        Ok(diary)
    }

    /// Clears the transcript and history.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored history cannot be removed.
    pub async fn reset(&self) -> Result<()> {
        *self.state() = ChatState::default();
        if let Some(store) = &self.store {
            store.remove(StorageKey::AssistantHistory).await?;
        }
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn expire_if_idle(&self) -> Result<()> {
        let expired = match &self.store {
            Some(store) => self.context.check_and_clear(store).await?,
            None => self.context.is_expired(),
        };
        if expired {
            self.state().history.clear();
        }
        Ok(())
    }

    fn fail(&self, placeholder: u64, err: Error) -> Error {
        self.state().remove(placeholder);
        error!("Chat request failed: {err}");
        err
    }

    async fn reveal(&self, id: u64, text: &str, mut on_frame: impl FnMut(&str)) {
        let mut typewriter = Typewriter::new(text);
        typewriter
            .run(self.interval, |frame| {
                if let Some(message) = self.state().find_mut(id) {
                    message.text = frame.to_string();
                }
                on_frame(frame);
            })
            .await;

        if let Some(message) = self.state().find_mut(id) {
            message.text = text.to_string();
            message.is_streaming = false;
        }
    }

    async fn touch(&self) -> Result<()> {
        self.context.touch();
        if let Some(store) = &self.store {
            self.context.save(store).await?;
        }
        Ok(())
    }

    async fn persist_history(&self) -> Result<()> {
        if let Some(store) = &self.store {
            let history = self.history();
            store.set(StorageKey::AssistantHistory, &history).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chat::MessageKind;
    use crate::time::MockClock;
    use chrono::Duration as ChronoDuration;
    use std::future::Future;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeBackend {
        fail_chat: AtomicBool,
        gate: Option<Arc<Notify>>,
        records: AtomicUsize,
        seen_history: Mutex<Vec<usize>>,
    }

    impl ChatBackend for FakeBackend {
        fn chat(
            &self,
            _user_id: i64,
            content: &str,
            history: &[HistoryEntry],
        ) -> impl Future<Output = daybook_api::Result<String>> + Send {
            self.seen_history.lock().unwrap().push(history.len());
            let fail = self.fail_chat.load(Ordering::SeqCst);
            let reply = format!("echo: {content}");
            let gate = self.gate.clone();
            async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                if fail {
                    Err(daybook_api::Error::api_error(500, "model overloaded"))
                } else {
                    Ok(reply)
                }
            }
        }

        fn save_chat_record(
            &self,
            _user_id: i64,
            _user_content: &str,
            _assistant_content: &str,
        ) -> impl Future<Output = daybook_api::Result<()>> + Send {
            self.records.fetch_add(1, Ordering::SeqCst);
            async { Err(daybook_api::Error::api_error(503, "analytics down")) }
        }

        fn upload_image(
            &self,
            path: &Path,
        ) -> impl Future<Output = daybook_api::Result<String>> + Send {
            let url = format!("https://cdn.example/{}", path.display());
            async move { Ok(url) }
        }

        fn understand_image(
            &self,
            _user_id: i64,
            _image_url: &str,
        ) -> impl Future<Output = daybook_api::Result<String>> + Send {
            async { Ok("a cat on a sofa".to_string()) }
        }

        fn generate_diary(
            &self,
            _user_id: i64,
            conversation: &[HistoryEntry],
        ) -> impl Future<Output = daybook_api::Result<String>> + Send {
            let diary = format!("Today I talked {} times.", conversation.len() / 2);
            async move { Ok(diary) }
        }
    }

    fn session(backend: FakeBackend) -> (Arc<MockClock>, ChatSession<FakeBackend>) {
        let clock = MockClock::shared();
        let context = Arc::new(SessionContext::new(clock.clone()));
        let session = ChatSession::new(backend, 7, context).with_interval(Duration::ZERO);
        (clock, session)
    }

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let (_, chat) = session(FakeBackend::default());
        let reply = chat.send("hello", |_| {}).await.unwrap();
        assert_eq!(reply, "echo: hello");

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].kind, MessageKind::User);
        assert_eq!(messages[0].text, "hello");
        assert_eq!(messages[1].kind, MessageKind::System);
        assert_eq!(messages[1].text, "echo: hello");
        assert!(!messages[1].is_streaming);
        assert_eq!(chat.history().len(), 2);
        assert!(!chat.is_sending());
    }

    #[tokio::test]
    async fn test_analytics_failure_is_swallowed() {
        let (_, chat) = session(FakeBackend::default());
        chat.send("a", |_| {}).await.unwrap();
        chat.send("b", |_| {}).await.unwrap();
        assert_eq!(chat.backend.records.load(Ordering::SeqCst), 2);
        assert_eq!(*chat.backend.seen_history.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_failure_removes_placeholder() {
        let backend = FakeBackend::default();
        backend.fail_chat.store(true, Ordering::SeqCst);
        let (_, chat) = session(backend);

        let err = chat.send("hello", |_| {}).await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));

        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_user());
        assert!(chat.history().is_empty());
        assert!(!chat.is_sending());
    }

    #[tokio::test]
    async fn test_second_send_is_rejected() {
        let gate = Arc::new(Notify::new());
        let backend = FakeBackend {
            gate: Some(gate.clone()),
            ..FakeBackend::default()
        };
        let (_, chat) = session(backend);

        let first = chat.send("one", |_| {});
        tokio::pin!(first);
        // Drive the first send up to the gated backend call
        assert!(futures_poll_once(first.as_mut()).await.is_none());
        assert!(chat.is_sending());

        let err = chat.send("two", |_| {}).await.unwrap_err();
        assert!(matches!(err, Error::SendInFlight));

        gate.notify_one();
        assert_eq!(first.await.unwrap(), "echo: one");
        assert!(!chat.is_sending());
        assert_eq!(chat.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_send_releases_guard() {
        let gate = Arc::new(Notify::new());
        let backend = FakeBackend {
            gate: Some(gate),
            ..FakeBackend::default()
        };
        let (_, chat) = session(backend);

        {
            let first = chat.send("one", |_| {});
            tokio::pin!(first);
            assert!(futures_poll_once(first.as_mut()).await.is_none());
            assert!(chat.is_sending());
        }
        assert!(!chat.is_sending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_frames() {
        let clock = MockClock::shared();
        let context = Arc::new(SessionContext::new(clock));
        let chat = ChatSession::new(FakeBackend::default(), 7, context)
            .with_interval(Duration::from_millis(20));

        let start = tokio::time::Instant::now();
        let mut frames = Vec::new();
        chat.send("hi", |f| frames.push(f.to_string())).await.unwrap();

        assert_eq!(frames.len(), "echo: hi".len());
        assert_eq!(frames.first().unwrap(), "e");
        assert_eq!(frames.last().unwrap(), "echo: hi");
        assert_eq!(start.elapsed(), Duration::from_millis(20 * 8));
    }

    #[tokio::test]
    async fn test_history_is_persisted_and_restored() {
        let store = KvStore::in_memory().await.unwrap();
        let clock = MockClock::shared();
        let context = Arc::new(SessionContext::new(clock.clone()));

        let chat = ChatSession::new(FakeBackend::default(), 7, context.clone())
            .with_interval(Duration::ZERO)
            .with_store(store.clone());
        chat.send("hello", |_| {}).await.unwrap();

        let again = ChatSession::new(FakeBackend::default(), 7, context)
            .with_interval(Duration::ZERO)
            .with_store(store.clone());
        again.restore().await.unwrap();
        assert_eq!(again.history().len(), 2);
        assert!(again.messages().is_empty());
    }

    #[tokio::test]
    async fn test_expired_session_drops_history() {
        let store = KvStore::in_memory().await.unwrap();
        let (clock, chat) = session(FakeBackend::default());
        let chat = chat.with_store(store.clone());

        chat.send("one", |_| {}).await.unwrap();
        clock.advance(ChronoDuration::minutes(31));
        chat.send("two", |_| {}).await.unwrap();

        assert_eq!(*chat.backend.seen_history.lock().unwrap(), vec![0, 0]);
        assert_eq!(chat.history().len(), 2);
        let stored: Vec<HistoryEntry> = store
            .get(StorageKey::AssistantHistory)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let (_, chat) = session(FakeBackend::default());
        for i in 0..(MAX_HISTORY / 2 + 5) {
            chat.send(&format!("m{i}"), |_| {}).await.unwrap();
        }
        let history = chat.history();
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].content, "m5");
    }

    #[tokio::test]
    async fn test_send_image() {
        let (_, chat) = session(FakeBackend::default());
        let reply = chat
            .send_image(Path::new("cat.jpg"), |_| {})
            .await
            .unwrap();
        assert_eq!(reply, "a cat on a sofa");

        let messages = chat.messages();
        assert_eq!(
            messages[0].image_url.as_deref(),
            Some("https://cdn.example/cat.jpg")
        );
        assert_eq!(messages[1].record_type, Some(RecordType::Image));
        assert_eq!(messages[1].text, "a cat on a sofa");
    }

    #[tokio::test]
    async fn test_generate_diary() {
        let (_, chat) = session(FakeBackend::default());
        assert!(matches!(
            chat.generate_diary(|_| {}).await.unwrap_err(),
            Error::InvalidState(_)
        ));

        chat.send("walked the dog", |_| {}).await.unwrap();
        let diary = chat.generate_diary(|_| {}).await.unwrap();
        assert_eq!(diary, "Today I talked 1 times.");

        let last = chat.messages().pop().unwrap();
        assert_eq!(last.record_type, Some(RecordType::Diary));
        assert_eq!(last.text, diary);
    }

    #[tokio::test]
    async fn test_absorb_and_reset() {
        let (_, chat) = session(FakeBackend::default());
        chat.send("hi", |_| {}).await.unwrap();
        chat.absorb(vec![Message::user(1, "queued")]);

        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].id, 3);

        chat.reset().await.unwrap();
        assert!(chat.messages().is_empty());
        assert!(chat.history().is_empty());
    }

    /// Polls a future once, returning its output if it completed.
    async fn futures_poll_once<F: Future + Unpin>(mut fut: F) -> Option<F::Output> {
        std::future::poll_fn(|cx| {
            std::task::Poll::Ready(match std::pin::Pin::new(&mut fut).poll(cx) {
                std::task::Poll::Ready(out) => Some(out),
                std::task::Poll::Pending => None,
            })
        })
        .await
    }
}
