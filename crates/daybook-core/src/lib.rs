//! # daybook-core
//!
//! Core logic for the Daybook diary and habit planner.
//!
//! This crate provides:
//! - **Chat sessions** - one request in flight, replies revealed by a typewriter
//! - **Plans** - cycle periods, check-in counting and history
//! - **Recording** - voice-note lifecycle, level metering, transcription
//! - **Session context** - inactivity timeout over an injectable clock
//! - **Auth** - login with cached-user fallback, token in the system keyring
//! - **Local cache** - `SQLite` key-value store
//! - **Settings** - JSON settings file with env overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod chat;
pub mod credentials;
mod error;
pub mod inbox;
pub mod operation_card;
pub mod plan;
pub mod recording;
pub mod session;
pub mod settings;
pub mod store;
pub mod time;

pub use auth::{AuthBackend, AuthService};
pub use chat::{ChatBackend, ChatSession, Message, MessageKind, RecordType, Typewriter};
pub use credentials::{
    CredentialError, CredentialResult, KeyringTokenStore, MemoryTokenStore, TokenStore,
};
pub use error::{Error, Result};
pub use inbox::Inbox;
pub use operation_card::OperationCard;
pub use plan::{PeriodTally, PlanProgress};
pub use recording::{
    AudioRecorder, RecordingOutcome, RecordingSession, RecordingState, SpeechBackend,
    normalize_level,
};
pub use session::SessionContext;
pub use settings::Settings;
pub use store::{KvStore, StorageKey};
pub use time::{Clock, MockClock, SharedClock, SystemClock};
