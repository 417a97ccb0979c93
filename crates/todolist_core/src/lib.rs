//! Core logic for a persisted, priority-sorted to-do list.
//! This crate is the single source of truth for list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::{resolve_db_path, StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo_item::{Priority, TodoItem, TodoValidationError};
pub use repo::todo_store::{LoadReport, StoreError, StoreResult, TodoStore};
pub use service::ordering::{display_order, display_positions};
pub use service::todo_controller::{
    ControllerError, ControllerResult, Renderer, TodoListController, TodoSummary,
};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
