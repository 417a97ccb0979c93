//! Persistence layer for the to-do list.
//!
//! # Responsibility
//! - Own the in-memory list and keep it mirrored to a `KeyValueStore`.
//! - Isolate JSON encoding details from controller logic.
//!
//! # Invariants
//! - Every write path rewrites the full serialized list.

pub mod todo_store;
