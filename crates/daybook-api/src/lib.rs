//! # daybook-api
//!
//! Async client for the Daybook diary and habit-planning backend.
//!
//! ## Features
//!
//! - **Chat**: streamed assistant replies (`data:` token protocol)
//! - **Diaries**: generation from a conversation, CRUD, recycle bin
//! - **Plans**: CRUD and check-ins
//! - **Media**: photo/voice upload, speech recognition, image understanding
//! - **Auth**: password login and current-user lookup
//!
//! ## Quick Start
//!
//! ```ignore
//! use daybook_api::{ApiClient, HistoryEntry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = ApiClient::new("https://daybook.example.com")?;
//!
//!     let login = client.login("lin", "secret").await?;
//!     client.set_token(Some(login.token));
//!
//!     let history = vec![HistoryEntry::user("I went hiking")];
//!     let reply = client
//!         .chat(login.user.id, "It rained the whole way", &history, |token| {
//!             print!("{token}");
//!         })
//!         .await?;
//!     println!("\n{} chars", reply.chars().count());
//!     Ok(())
//! }
//! ```
//!
//! ## Responses
//!
//! Non-streaming endpoints answer with `{code, data, msg}`; codes `0` and
//! `200` mean success and anything else becomes [`Error::Api`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
pub mod endpoint;
mod envelope;
mod error;
pub mod model;
pub mod stream;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use endpoint::{MediaKind, guess_content_type};
pub use envelope::ApiResponse;
pub use error::{Error, Result};
pub use model::{
    Cycle, DeletedDiary, DiaryDetail, DiaryQuery, DiaryUpdate, HistoryEntry, LoginResponse,
    NewPlan, Plan, PlanRecord, PlanUpdate, Role, User,
};
pub use stream::ReplyCollector;
