//! Error types for the relay core.

/// Errors surfaced by the relay engine and the wire protocol.
///
/// Only `Bind` is fatal: a node that cannot listen cannot start. `Dial` is
/// returned to the caller, who may retry or carry on without that peer.
/// `Decode` marks a line as "not a protocol message" and `Encode` drops the
/// affected send; neither ever tears down a connection.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Binding the listen address failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Dialing a remote peer failed. Nothing was registered.
    #[error("failed to dial {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A message could not be serialized to its wire form.
    #[error("failed to encode message: {0}")]
    Encode(String),

    /// A line was not a valid wire message.
    #[error("failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
}
