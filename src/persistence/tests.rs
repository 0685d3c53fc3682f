use tempfile::tempdir;

use super::{MemoryStore, MessageStore, SledStore, StoreError};

fn open_sled_store() -> (SledStore, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = SledStore::open(dir.path().to_str().unwrap()).unwrap();
    (store, dir)
}

#[test]
fn test_sled_save_and_query_undelivered() {
    let (store, _dir) = open_sled_store();

    store.save_message("alice", "first", 100, false).unwrap();
    store.save_message("bob", "own copy", 200, true).unwrap();
    store.save_message("alice", "second", 300, false).unwrap();

    let pending = store.undelivered().unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].content, "first");
    assert_eq!(pending[1].content, "second");
    assert!(pending[0].id < pending[1].id, "ids must ascend");
}

#[test]
fn test_sled_mark_delivered() {
    let (store, _dir) = open_sled_store();

    store.save_message("alice", "backlog", 100, false).unwrap();
    let pending = store.undelivered().unwrap();
    assert_eq!(pending.len(), 1);

    store.mark_delivered(pending[0].id).unwrap();
    assert!(store.undelivered().unwrap().is_empty());
}

#[test]
fn test_sled_mark_delivered_unknown_id() {
    let (store, _dir) = open_sled_store();
    let err = store.mark_delivered(9999).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(9999)));
}

#[test]
fn test_sled_subscriptions_roundtrip() {
    let (store, _dir) = open_sled_store();

    store.save_subscription("alice", "news").unwrap();
    store.save_subscription("alice", "dev").unwrap();
    store.save_subscription("bob", "music").unwrap();

    let topics = store.subscriptions("alice").unwrap();
    assert_eq!(topics.len(), 2);
    assert!(topics.contains("news"));
    assert!(topics.contains("dev"));

    store.remove_subscription("alice", "news").unwrap();
    let topics = store.subscriptions("alice").unwrap();
    assert_eq!(topics.len(), 1);
    assert!(topics.contains("dev"));

    // per-user isolation
    let topics = store.subscriptions("bob").unwrap();
    assert_eq!(topics.len(), 1);
    assert!(topics.contains("music"));
}

#[test]
fn test_memory_undelivered_keeps_insertion_order() {
    let store = MemoryStore::new();

    store.save_message("x", "one", 1, false).unwrap();
    store.save_message("x", "two", 2, true).unwrap();
    store.save_message("x", "three", 3, false).unwrap();

    let pending = store.undelivered().unwrap();
    let contents: Vec<_> = pending.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "three"]);
}

#[test]
fn test_memory_mark_delivered() {
    let store = MemoryStore::new();

    store.save_message("x", "pending", 1, false).unwrap();
    let id = store.undelivered().unwrap()[0].id;

    store.mark_delivered(id).unwrap();
    assert!(store.undelivered().unwrap().is_empty());
    assert!(store.messages()[0].delivered);

    let err = store.mark_delivered(42).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(42)));
}

#[test]
fn test_memory_subscriptions() {
    let store = MemoryStore::new();

    assert!(store.subscriptions("nobody").unwrap().is_empty());

    store.save_subscription("alice", "news").unwrap();
    assert!(store.subscriptions("alice").unwrap().contains("news"));

    store.remove_subscription("alice", "news").unwrap();
    assert!(store.subscriptions("alice").unwrap().is_empty());

    // removing for an unknown user is a no-op
    store.remove_subscription("ghost", "news").unwrap();
}
