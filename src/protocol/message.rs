use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::utils::error::RelayError;

/// Classification of a wire message, derived from its `type` tag.
///
/// Tags this node does not recognize map to `Unknown`. Such messages are
/// still persisted and forwarded unchanged; only their display differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Chat,
    Notification,
    Command,
    Unknown,
}

/// A single protocol unit exchanged between peers.
///
/// Field names on the wire follow the original JSON schema (`type`,
/// `fileUrl`, `fileName`), so nodes can interoperate across versions.
/// `file_url` and `file_name` are opaque attachment metadata: the relay
/// carries and stores them without interpretation.
///
/// # Example
///
/// ```rust
/// use meshchat::protocol::Message;
///
/// let mut msg = Message::chat("alice", "hello mesh");
/// let line = msg.encode().unwrap();
/// let parsed = Message::decode(&line).unwrap();
/// assert_eq!(parsed.sender, "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Empty means "broadcast to all": the subscription filter is bypassed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub topic: String,
    /// Unix milliseconds, stamped by [`encode`](Message::encode) at send time.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Message {
    /// Creates a plain chat message with no topic or attachment.
    pub fn chat(sender: &str, content: &str) -> Self {
        Self {
            kind: "chat".to_string(),
            sender: sender.to_string(),
            content: content.to_string(),
            topic: String::new(),
            timestamp: 0,
            file_url: None,
            file_name: None,
        }
    }

    /// Maps the free-form `type` tag onto a [`MessageKind`].
    pub fn classify(&self) -> MessageKind {
        match self.kind.as_str() {
            "chat" => MessageKind::Chat,
            "notification" => MessageKind::Notification,
            "command" => MessageKind::Command,
            _ => MessageKind::Unknown,
        }
    }

    /// Serializes the message to its single-line wire form.
    ///
    /// The timestamp is always overwritten with the current time, regardless
    /// of any caller-supplied value: outgoing messages are stamped at the
    /// point of transmission. JSON string escaping keeps field content on one
    /// line, but the final form is still checked so a framing break can never
    /// reach the socket.
    pub fn encode(&mut self) -> Result<String, RelayError> {
        self.timestamp = Utc::now().timestamp_millis();
        let line =
            serde_json::to_string(self).map_err(|e| RelayError::Encode(e.to_string()))?;
        if line.contains('\n') {
            return Err(RelayError::Encode(
                "encoded message contains a line break".to_string(),
            ));
        }
        Ok(line)
    }

    /// Parses one wire line back into a message.
    ///
    /// Failure means "this line is not a protocol message". Callers fall back
    /// to treating the raw line as opaque display text; they must not abort
    /// the connection over it.
    pub fn decode(line: &str) -> Result<Self, RelayError> {
        Ok(serde_json::from_str(line)?)
    }
}
