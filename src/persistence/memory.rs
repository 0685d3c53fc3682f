use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::persistence::{MessageStore, StoreError, StoredMessage};

/// In-memory [`MessageStore`].
///
/// Used by the test suite to observe what a node persisted, and usable for
/// ephemeral nodes that don't need history to survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    messages: Vec<StoredMessage>,
    subscriptions: HashMap<String, HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored record, in insertion (= ascending id) order.
    pub fn messages(&self) -> Vec<StoredMessage> {
        self.inner.lock().unwrap().messages.clone()
    }
}

impl MessageStore for MemoryStore {
    fn save_message(
        &self,
        sender: &str,
        content: &str,
        timestamp: i64,
        delivered: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.messages.push(StoredMessage {
            id,
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp,
            delivered,
        });
        Ok(())
    }

    fn undelivered(&self) -> Result<Vec<StoredMessage>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .messages
            .iter()
            .filter(|m| !m.delivered)
            .cloned()
            .collect())
    }

    fn mark_delivered(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.delivered = true;
        Ok(())
    }

    fn subscriptions(&self, user: &str) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.subscriptions.get(user).cloned().unwrap_or_default())
    }

    fn save_subscription(&self, user: &str, topic: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .subscriptions
            .entry(user.to_string())
            .or_default()
            .insert(topic.to_string());
        Ok(())
    }

    fn remove_subscription(&self, user: &str, topic: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(topics) = inner.subscriptions.get_mut(user) {
            topics.remove(topic);
        }
        Ok(())
    }
}
