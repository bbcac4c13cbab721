//! Local key-value cache.
//!
//! Holds the small pieces of state the client keeps between runs: the
//! cached user, background-arrival queues, the assistant history, the
//! unread badge and the operation-card timestamp.

mod keys;
mod repository;

pub use keys::StorageKey;
pub use repository::KvStore;
