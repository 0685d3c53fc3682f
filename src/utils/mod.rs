//! The `utils` module contains shared utilities used across the node.
//!
//! This currently covers the relay error taxonomy and tracing setup.

pub mod error;
pub mod logging;
