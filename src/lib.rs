//! # meshchat
//!
//! `meshchat` is a small peer-to-peer chat relay built with Rust. Each node
//! keeps direct TCP links to a set of other nodes, floods chat messages across
//! that link set, and replays undelivered history to peers that connect later.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `relay`: the engine that owns peer links, filters messages by topic, floods them
//!   across the mesh and replays the offline backlog to new peers.
//! - `protocol`: the line-delimited JSON wire format exchanged between peers.
//! - `persistence`: the storage port the relay writes through, with sled and
//!   in-memory implementations.
//! - `config`: handles loading and merging of node configuration.
//! - `utils`: contains shared utilities, such as error types and logging setup.

pub mod config;
pub mod persistence;
pub mod protocol;
pub mod relay;
pub mod utils;
