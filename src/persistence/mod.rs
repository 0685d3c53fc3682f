//! The `persistence` module provides mechanisms for storing and retrieving messages.
//!
//! The relay core only depends on the [`MessageStore`] trait: every message it
//! receives or originates is saved through it, and the offline-delivery pass
//! reads undelivered history back out of it. Subscription state for the local
//! node lives behind the same port.
//!
//! Two implementations are provided: [`SledStore`], backed by a `sled`
//! embedded key-value store for durable history, and [`MemoryStore`] for
//! tests and ephemeral nodes.

pub mod memory;
pub mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A message record held by the backing store.
///
/// `delivered` starts out true for the node's own copy of anything it
/// received or broadcast. Records saved with `delivered = false` form the
/// backlog replayed to the next peer that connects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredMessage {
    pub id: u64,
    pub sender: String,
    pub content: String,
    pub timestamp: i64,
    pub delivered: bool,
}

/// Errors from the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no stored message with id {0}")]
    NotFound(u64),
}

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// The persistence port the relay core calls into.
///
/// Implementations serialize their own writes; the relay issues calls from
/// multiple tasks without additional locking. No transactional grouping is
/// offered across a persist-then-forward sequence.
pub trait MessageStore: Send + Sync {
    /// Appends a message record, assigning it the next ascending id.
    fn save_message(
        &self,
        sender: &str,
        content: &str,
        timestamp: i64,
        delivered: bool,
    ) -> Result<(), StoreError>;

    /// All records not yet marked delivered, ascending by id.
    fn undelivered(&self) -> Result<Vec<StoredMessage>, StoreError>;

    /// Flags one record as delivered.
    fn mark_delivered(&self, id: u64) -> Result<(), StoreError>;

    /// The set of topics `user` is subscribed to.
    fn subscriptions(&self, user: &str) -> Result<HashSet<String>, StoreError>;

    /// Records a topic subscription for `user`.
    fn save_subscription(&self, user: &str, topic: &str) -> Result<(), StoreError>;

    /// Drops a topic subscription for `user`.
    fn remove_subscription(&self, user: &str, topic: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests;
