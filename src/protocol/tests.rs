use chrono::Utc;

use super::message::{Message, MessageKind};
use crate::utils::error::RelayError;

#[test]
fn test_roundtrip_preserves_fields_except_timestamp() {
    let mut msg = Message::chat("alice", "hello mesh");
    msg.topic = "general".to_string();
    msg.file_url = Some("/uploads/cat.gif".to_string());
    msg.file_name = Some("cat.gif".to_string());
    msg.timestamp = 42; // must be overwritten by encode

    let before = Utc::now().timestamp_millis();
    let line = msg.encode().unwrap();
    let after = Utc::now().timestamp_millis();

    let parsed = Message::decode(&line).unwrap();
    assert_eq!(parsed.kind, "chat");
    assert_eq!(parsed.sender, "alice");
    assert_eq!(parsed.content, "hello mesh");
    assert_eq!(parsed.topic, "general");
    assert_eq!(parsed.file_url.as_deref(), Some("/uploads/cat.gif"));
    assert_eq!(parsed.file_name.as_deref(), Some("cat.gif"));
    assert!(parsed.timestamp >= before && parsed.timestamp <= after);
}

#[test]
fn test_encode_escapes_embedded_newlines() {
    let mut msg = Message::chat("bob", "line one\nline two");
    let line = msg.encode().unwrap();

    // The wire form must stay a single line or stream framing breaks.
    assert!(!line.contains('\n'));

    let parsed = Message::decode(&line).unwrap();
    assert_eq!(parsed.content, "line one\nline two");
}

#[test]
fn test_unknown_kind_is_preserved_on_the_wire() {
    let mut msg = Message::chat("carol", "payload");
    msg.kind = "telemetry".to_string();

    let line = msg.encode().unwrap();
    let parsed = Message::decode(&line).unwrap();

    assert_eq!(parsed.kind, "telemetry");
    assert_eq!(parsed.classify(), MessageKind::Unknown);
}

#[test]
fn test_classify_known_kinds() {
    let mut msg = Message::chat("a", "b");
    assert_eq!(msg.classify(), MessageKind::Chat);
    msg.kind = "notification".to_string();
    assert_eq!(msg.classify(), MessageKind::Notification);
    msg.kind = "command".to_string();
    assert_eq!(msg.classify(), MessageKind::Command);
}

#[test]
fn test_decode_rejects_non_json_line() {
    let err = Message::decode("hello, is this thing on?").unwrap_err();
    assert!(matches!(err, RelayError::Decode(_)));
}

#[test]
fn test_empty_optional_fields_are_omitted() {
    let mut msg = Message::chat("dave", "");
    let line = msg.encode().unwrap();

    assert!(!line.contains("topic"));
    assert!(!line.contains("content"));
    assert!(!line.contains("fileUrl"));

    let parsed = Message::decode(&line).unwrap();
    assert_eq!(parsed.content, "");
    assert_eq!(parsed.topic, "");
    assert_eq!(parsed.file_url, None);
}

#[test]
fn test_decode_fills_missing_fields_with_defaults() {
    let parsed = Message::decode(r#"{"type":"chat","sender":"eve"}"#).unwrap();
    assert_eq!(parsed.sender, "eve");
    assert_eq!(parsed.content, "");
    assert_eq!(parsed.topic, "");
    assert_eq!(parsed.timestamp, 0);
}
