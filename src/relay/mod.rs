//! The `relay` module is the peer-mesh networking and delivery layer.
//!
//! [`Relay`] owns the full lifecycle of every peer link: accept or dial,
//! the per-connection read loop, topic filtering, flood forwarding with
//! origin exclusion, and teardown. The [`Registry`] tracks the live link
//! set, the [`SubscriptionFilter`] gates inbound messages by topic, and
//! `backlog` replays undelivered history to freshly connected peers.

pub mod backlog;
pub mod engine;
pub mod filter;
pub mod registry;

pub use engine::Relay;
pub use filter::SubscriptionFilter;
pub use registry::{PeerHandle, PeerId, Registry};
