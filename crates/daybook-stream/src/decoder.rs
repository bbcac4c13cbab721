//! Incremental decoder for chunked response bodies.
//!
//! Network chunks do not respect line boundaries, so the decoder buffers
//! the unfinished tail of each chunk until its newline arrives.

use bytes::BytesMut;

use crate::error::{Error, Result};
use crate::event::{StreamEvent, parse_line};

/// Default buffer size for reading.
const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Maximum line length to prevent memory exhaustion.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024; // 1 MB

/// Incremental decoder for the `data:` token stream.
///
/// Feed it raw body chunks as they arrive; it returns the events completed
/// by each chunk. Once a terminal event ([`StreamEvent::Done`] or
/// [`StreamEvent::Error`]) has been produced, further input is ignored.
#[derive(Debug)]
pub struct StreamDecoder {
    buffer: BytesMut,
    finished: bool,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
            finished: false,
        }
    }

    /// Returns true once a terminal event has been decoded.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feeds one chunk of the body and returns the events it completes.
    ///
    /// # Errors
    ///
    /// Returns an error if a completed line is not valid UTF-8 or if the
    /// pending line exceeds [`MAX_LINE_LENGTH`].
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>> {
        let mut events = Vec::new();
        if self.finished {
            return Ok(events);
        }

        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            let text = std::str::from_utf8(&line[..pos])?;

            if let Some(event) = parse_line(text) {
                let terminal = event.is_terminal();
                events.push(event);
                if terminal {
                    self.finished = true;
                    self.buffer.clear();
                    return Ok(events);
                }
            }
        }

        if self.buffer.len() > MAX_LINE_LENGTH {
            return Err(Error::LineTooLong(self.buffer.len(), MAX_LINE_LENGTH));
        }

        Ok(events)
    }

    /// Flushes a final line that was not newline-terminated.
    ///
    /// Call this when the body ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailing bytes are not valid UTF-8.
    pub fn finish(&mut self) -> Result<Option<StreamEvent>> {
        if self.finished || self.buffer.is_empty() {
            self.buffer.clear();
            return Ok(None);
        }

        let line = self.buffer.split();
        let event = parse_line(std::str::from_utf8(&line)?);
        if event.as_ref().is_some_and(StreamEvent::is_terminal) {
            self.finished = true;
        }
        Ok(event)
    }
}
