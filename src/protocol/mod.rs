//! The `protocol` module defines the wire format spoken between peers.
//!
//! A message travels as exactly one line of JSON over a raw TCP stream;
//! the newline is the only framing. Encoding therefore guarantees that no
//! literal line break survives into the serialized form.

pub mod message;

pub use message::{Message, MessageKind};

#[cfg(test)]
mod tests;
