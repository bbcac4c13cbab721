//! Endpoint groups, one `impl ApiClient` block per backend area.

mod auth;
mod chat;
mod diary;
mod location;
mod media;
mod plan;

pub use media::{MediaKind, guess_content_type};
