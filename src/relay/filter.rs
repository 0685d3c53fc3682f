use std::collections::HashSet;
use std::sync::Mutex;

/// The set of topics this node currently cares about.
///
/// The empty topic is implicitly always subscribed: untopiced messages reach
/// every node. Mutations take effect for all messages processed after the
/// call returns. Persisting the set is the caller's responsibility, not the
/// filter's.
#[derive(Debug, Default)]
pub struct SubscriptionFilter {
    topics: Mutex<HashSet<String>>,
}

impl SubscriptionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: &str) {
        self.topics.lock().unwrap().insert(topic.to_string());
    }

    pub fn unsubscribe(&self, topic: &str) {
        self.topics.lock().unwrap().remove(topic);
    }

    /// Whether a message tagged `topic` should be processed by this node.
    pub fn is_allowed(&self, topic: &str) -> bool {
        topic.is_empty() || self.topics.lock().unwrap().contains(topic)
    }

    /// The currently subscribed topics.
    pub fn topics(&self) -> HashSet<String> {
        self.topics.lock().unwrap().clone()
    }
}
