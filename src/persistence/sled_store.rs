use std::collections::HashSet;

use sled::{Db, Tree};

use crate::persistence::{MessageStore, StoreError, StoredMessage};

/// Durable [`MessageStore`] backed by a `sled` embedded database.
///
/// Message records live in one tree keyed by their big-endian id, so
/// iteration order is ascending id order. Each user's subscriptions live
/// in a tree of their own, keyed by topic name.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
    messages: Tree,
}

impl SledStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let messages = db.open_tree("messages")?;
        Ok(Self { db, messages })
    }

    fn subscription_tree(&self, user: &str) -> Result<Tree, StoreError> {
        Ok(self.db.open_tree(format!("subscriptions/{user}"))?)
    }
}

impl MessageStore for SledStore {
    fn save_message(
        &self,
        sender: &str,
        content: &str,
        timestamp: i64,
        delivered: bool,
    ) -> Result<(), StoreError> {
        let record = StoredMessage {
            id: self.db.generate_id()?,
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp,
            delivered,
        };
        let bytes = serde_json::to_vec(&record)?;
        self.messages.insert(record.id.to_be_bytes(), bytes)?;
        Ok(())
    }

    fn undelivered(&self) -> Result<Vec<StoredMessage>, StoreError> {
        let mut pending = Vec::new();
        for entry in self.messages.iter() {
            let (_, value) = entry?;
            let record: StoredMessage = serde_json::from_slice(&value)?;
            if !record.delivered {
                pending.push(record);
            }
        }
        Ok(pending)
    }

    fn mark_delivered(&self, id: u64) -> Result<(), StoreError> {
        let key = id.to_be_bytes();
        let Some(value) = self.messages.get(key)? else {
            return Err(StoreError::NotFound(id));
        };
        let mut record: StoredMessage = serde_json::from_slice(&value)?;
        record.delivered = true;
        self.messages.insert(key, serde_json::to_vec(&record)?)?;
        Ok(())
    }

    fn subscriptions(&self, user: &str) -> Result<HashSet<String>, StoreError> {
        let tree = self.subscription_tree(user)?;
        let mut topics = HashSet::new();
        for entry in tree.iter() {
            let (key, _) = entry?;
            topics.insert(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(topics)
    }

    fn save_subscription(&self, user: &str, topic: &str) -> Result<(), StoreError> {
        let tree = self.subscription_tree(user)?;
        tree.insert(topic.as_bytes(), &[] as &[u8])?;
        Ok(())
    }

    fn remove_subscription(&self, user: &str, topic: &str) -> Result<(), StoreError> {
        let tree = self.subscription_tree(user)?;
        tree.remove(topic.as_bytes())?;
        Ok(())
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .finish()
    }
}
