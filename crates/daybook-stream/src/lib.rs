//! # daybook-stream
//!
//! Decoder for the line protocol that the Daybook backend uses to stream
//! chat replies and generated diary text.
//!
//! Each line of the response body is either blank, a comment, or a
//! `data:` line. A `data:` line carries one of:
//!
//! - `{"token": "..."}` - the next piece of text
//! - `{"error": "..."}` - the server gave up
//! - `[DONE]` - end of stream
//!
//! ## Quick Start
//!
//! ```
//! use daybook_stream::{StreamDecoder, StreamEvent};
//!
//! let mut decoder = StreamDecoder::new();
//! let mut events = decoder.feed(b"data: {\"token\": \"Hel\"}\ndata: {\"tok").unwrap();
//! events.extend(decoder.feed(b"en\": \"lo\"}\ndata: [DONE]\n").unwrap());
//!
//! assert_eq!(
//!     events,
//!     vec![
//!         StreamEvent::Token("Hel".into()),
//!         StreamEvent::Token("lo".into()),
//!         StreamEvent::Done,
//!     ]
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod decoder;
mod error;
mod event;

pub use decoder::{MAX_LINE_LENGTH, StreamDecoder};
pub use error::{Error, Result};
pub use event::{StreamEvent, parse_line};
