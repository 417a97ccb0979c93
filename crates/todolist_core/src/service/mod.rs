//! Use-case layer over the persisted list.
//!
//! # Responsibility
//! - Apply user-intent events to the store.
//! - Own the display ordering policy.

pub mod ordering;
pub mod todo_controller;
