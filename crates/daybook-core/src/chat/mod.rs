//! Chat with the assistant.
//!
//! A [`ChatSession`] owns the transcript of one conversation. Each send
//! appends the user's message and an empty placeholder, waits for the full
//! reply and then reveals it into the placeholder with a [`Typewriter`].

mod backend;
mod message;
mod session;
mod typewriter;

pub use backend::ChatBackend;
pub use message::{Message, MessageKind, RecordType};
pub use session::{ChatSession, MAX_HISTORY};
pub use typewriter::{DEFAULT_INTERVAL, Typewriter};
