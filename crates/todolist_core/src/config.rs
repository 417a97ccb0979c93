//! Store configuration and environment lookups.
//!
//! # Invariants
//! - The storage key is never empty after trim.
//! - Environment overrides that are blank are treated as unset.

use std::path::PathBuf;

/// Key the list is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "todos";
/// Suffix appended to the storage key when a corrupt value is set aside.
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";
/// Environment variable naming the SQLite database file.
pub const DB_PATH_ENV: &str = "TODOLIST_DB_PATH";

const DEFAULT_DB_FILE_NAME: &str = "todolist.sqlite3";

/// Where in the key-value store the list lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Uses `key` when it is non-blank, the default key otherwise.
    pub fn with_storage_key(key: &str) -> Self {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        Self {
            storage_key: trimmed.to_string(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Key receiving the raw value when stored data cannot be parsed.
    pub fn backup_key(&self) -> String {
        format!("{}{CORRUPT_BACKUP_SUFFIX}", self.storage_key)
    }
}

/// Resolves the database path: explicit value, then `TODOLIST_DB_PATH`,
/// then a file in the OS temp directory.
pub fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return path;
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{resolve_db_path, StoreConfig, DEFAULT_STORAGE_KEY};
    use std::path::PathBuf;

    #[test]
    fn blank_key_falls_back_to_default() {
        assert_eq!(StoreConfig::with_storage_key("  ").storage_key(), DEFAULT_STORAGE_KEY);
        assert_eq!(StoreConfig::with_storage_key(" work ").storage_key(), "work");
    }

    #[test]
    fn backup_key_is_derived_from_storage_key() {
        assert_eq!(StoreConfig::default().backup_key(), "todos.corrupt");
    }

    #[test]
    fn explicit_db_path_wins() {
        let path = PathBuf::from("/tmp/explicit.sqlite3");
        assert_eq!(resolve_db_path(Some(path.clone())), path);
    }
}
