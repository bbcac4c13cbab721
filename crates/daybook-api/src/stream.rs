//! Reading `data:` token streams off an HTTP response.

use daybook_stream::{StreamDecoder, StreamEvent};
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Accumulates stream events into the reply text.
///
/// Every streaming endpoint (chat, diary generation) goes through this one
/// type so the termination rules live in a single place.
#[derive(Debug, Default)]
pub struct ReplyCollector {
    text: String,
    tokens: usize,
    done: bool,
}

impl ReplyCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event. Returns `Ok(true)` once the stream is complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamAborted`] when the server sends an error event.
    pub fn push(&mut self, event: StreamEvent, on_token: &mut impl FnMut(&str)) -> Result<bool> {
        match event {
            StreamEvent::Token(token) => {
                on_token(&token);
                self.text.push_str(&token);
                self.tokens += 1;
                Ok(false)
            }
            StreamEvent::Done => {
                self.done = true;
                Ok(true)
            }
            StreamEvent::Error(reason) => Err(Error::StreamAborted(reason)),
        }
    }

    /// Text received so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Finishes the collection once the body has ended.
    ///
    /// A body that ends without `[DONE]` still yields whatever text arrived;
    /// only a body with neither text nor `[DONE]` is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEof`] if nothing at all was received.
    pub fn finish(self) -> Result<String> {
        if !self.done {
            if self.tokens == 0 {
                return Err(Error::UnexpectedEof);
            }
            warn!(
                "Stream ended without [DONE] after {} tokens; keeping partial reply",
                self.tokens
            );
        }
        debug!("Stream complete: {} tokens, {} chars", self.tokens, self.text.chars().count());
        Ok(self.text)
    }
}

/// Drains a streaming response, calling `on_token` for each token.
///
/// # Errors
///
/// Returns an error if the body cannot be read or decoded, or if the server
/// aborts the stream.
pub(crate) async fn read_reply(
    response: reqwest::Response,
    mut on_token: impl FnMut(&str),
) -> Result<String> {
    let mut decoder = StreamDecoder::new();
    let mut collector = ReplyCollector::new();
    let mut body = response.bytes_stream();

    'body: while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for event in decoder.feed(&chunk)? {
            if collector.push(event, &mut on_token)? {
                break 'body;
            }
        }
    }

    if !decoder.is_finished() {
        if let Some(event) = decoder.finish()? {
            collector.push(event, &mut on_token)?;
        }
    }

    collector.finish()
}
