//! Domain model for to-do list entries.
//!
//! # Responsibility
//! - Define the canonical item shape shared by store, controller and renderers.
//! - Own the validation rules applied at every input boundary.
//!
//! # Invariants
//! - Items carry no identity field; position in the list is the only handle.
//! - `text` and `priority` never change after creation.

pub mod todo_item;
