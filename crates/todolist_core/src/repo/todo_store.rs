//! Authoritative in-memory list plus its persisted mirror.
//!
//! # Responsibility
//! - Load the list from a `KeyValueStore` under one key.
//! - Rewrite the full serialized list after every mutation.
//! - Recover from corrupt stored data by resetting to an empty list.
//!
//! # Invariants
//! - After any operation returns, the stored value equals the JSON encoding
//!   of `items()`. An absent or `null` value is equivalent to the empty list.
//!   A corruption recovery whose writes fail is the one exception: memory is
//!   empty while storage still holds the unreadable value.
//! - A failed write rolls the in-memory list back to the last saved state.
//! - Items are kept in insertion order; display order is derived elsewhere.

use crate::config::StoreConfig;
use crate::model::todo_item::{TodoItem, TodoValidationError};
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from list persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// Caller addressed a position that does not exist.
    Validation(TodoValidationError),
    /// Key-value backend failed.
    Storage(StorageError),
    /// List could not be encoded as JSON.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode todo list: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<TodoValidationError> for StoreError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// What `load` found under the storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// Nothing stored yet; the list starts empty.
    Absent,
    /// Stored list parsed successfully.
    Loaded { count: usize },
    /// Stored value was unreadable. The raw value was copied to
    /// `backup_key` and the list was reset to empty.
    RecoveredFromCorruption { backup_key: String, reason: String },
}

impl LoadReport {
    pub fn is_recovery(&self) -> bool {
        matches!(self, Self::RecoveredFromCorruption { .. })
    }
}

/// Encodes items as the stored JSON array.
pub fn encode_items(items: &[TodoItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Decodes the stored JSON array. A stored `null` decodes to `None`.
/// Any malformed record fails the whole value.
pub fn decode_items(raw: &str) -> Result<Option<Vec<TodoItem>>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// List owner bound to one key of a key-value store.
pub struct TodoStore<S: KeyValueStore> {
    kv: S,
    config: StoreConfig,
    items: Vec<TodoItem>,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Creates a store and performs the initial load.
    pub fn open(kv: S, config: StoreConfig) -> StoreResult<(Self, LoadReport)> {
        let mut store = Self {
            kv,
            config,
            items: Vec::new(),
        };
        let report = store.load()?;
        Ok((store, report))
    }

    /// Replaces the in-memory list with the stored one.
    ///
    /// An absent key or a stored `null` loads as the empty list. Corrupt
    /// content is copied to a free backup key, then the stored list is reset
    /// to `[]`. On a backend error before anything was read the in-memory
    /// list is left as is.
    pub fn load(&mut self) -> StoreResult<LoadReport> {
        let key = self.config.storage_key();
        let Some(raw) = self.kv.get(key)? else {
            self.items.clear();
            info!("event=todo_store_load module=repo status=ok source=absent count=0");
            return Ok(LoadReport::Absent);
        };

        match decode_items(&raw) {
            Ok(Some(items)) => {
                let count = items.len();
                self.items = items;
                info!("event=todo_store_load module=repo status=ok source=stored count={count}");
                Ok(LoadReport::Loaded { count })
            }
            Ok(None) => {
                self.items.clear();
                info!("event=todo_store_load module=repo status=ok source=null count=0");
                Ok(LoadReport::Absent)
            }
            Err(err) => self.recover_from_corruption(&raw, &err),
        }
    }

    /// Sets the unreadable value aside and resets the list.
    ///
    /// Memory is emptied first. If a backup or reset write then fails, the
    /// error is returned while storage still holds the unreadable value; the
    /// next `load` retries the recovery.
    fn recover_from_corruption(
        &mut self,
        raw: &str,
        err: &serde_json::Error,
    ) -> StoreResult<LoadReport> {
        self.items.clear();
        let backup_key = self.free_backup_key()?;
        warn!(
            "event=todo_store_load module=repo status=recovered error_code=storage_corruption bytes={} line={} column={}",
            raw.len(),
            err.line(),
            err.column()
        );
        self.kv.set(&backup_key, raw)?;
        let empty = encode_items(&[]).map_err(StoreError::Encode)?;
        self.kv.set(self.config.storage_key(), &empty)?;
        Ok(LoadReport::RecoveredFromCorruption {
            backup_key,
            reason: err.to_string(),
        })
    }

    /// First of `<key>.corrupt`, `<key>.corrupt.1`, ... with no stored value.
    fn free_backup_key(&self) -> StoreResult<String> {
        let base = self.config.backup_key();
        if self.kv.get(&base)?.is_none() {
            return Ok(base);
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{base}.{suffix}");
            if self.kv.get(&candidate)?.is_none() {
                return Ok(candidate);
            }
            suffix += 1;
        }
    }

    /// Overwrites the whole list and persists it.
    pub fn save(&mut self, items: Vec<TodoItem>) -> StoreResult<()> {
        self.mutate(|current| *current = items)
    }

    /// Appends one item at the end of insertion order and persists.
    pub fn append(&mut self, item: TodoItem) -> StoreResult<()> {
        self.mutate(|current| current.push(item))
    }

    /// Sets the completion flag of the item at `position` (insertion order).
    pub fn set_completed(&mut self, position: usize, completed: bool) -> StoreResult<()> {
        self.check_position(position)?;
        self.mutate(|current| current[position].set_completed(completed))
    }

    /// Removes and returns the item at `position` (insertion order).
    pub fn remove_at(&mut self, position: usize) -> StoreResult<TodoItem> {
        self.check_position(position)?;
        self.mutate(|current| current.remove(position))
    }

    /// Keeps only items matching `keep`; returns how many were dropped.
    pub fn retain(&mut self, keep: impl FnMut(&TodoItem) -> bool) -> StoreResult<usize> {
        self.mutate(|current| {
            let before = current.len();
            current.retain(keep);
            before - current.len()
        })
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Releases the underlying key-value store.
    pub fn into_inner(self) -> S {
        self.kv
    }

    fn check_position(&self, position: usize) -> Result<(), TodoValidationError> {
        if position >= self.items.len() {
            return Err(TodoValidationError::IndexOutOfRange {
                index: position,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn mutate<T>(&mut self, apply: impl FnOnce(&mut Vec<TodoItem>) -> T) -> StoreResult<T> {
        let snapshot = self.items.clone();
        let output = apply(&mut self.items);
        if let Err(err) = self.persist() {
            self.items = snapshot;
            return Err(err);
        }
        Ok(output)
    }

    fn persist(&mut self) -> StoreResult<()> {
        let encoded = encode_items(&self.items).map_err(StoreError::Encode)?;
        if let Err(err) = self.kv.set(self.config.storage_key(), &encoded) {
            warn!(
                "event=todo_store_save module=repo status=error error_code=storage_write_failed count={} error={}",
                self.items.len(),
                err
            );
            return Err(err.into());
        }
        debug!(
            "event=todo_store_save module=repo status=ok count={} bytes={}",
            self.items.len(),
            encoded.len()
        );
        Ok(())
    }
}
