//! Concurrency layer for `IndexedDeque`.
//!
//! Important: `IndexedDeque` itself is a plain single-owner value with no internal
//! synchronization. This module provides the one supported way to share it: a
//! dedicated worker that owns the deque and executes requests strictly one at a time.

pub mod channel;
pub mod serialized;

pub use serialized::{AccessConfig, AccessError, Command, Reply, SerializedDeque};
