//! To-do list use-case controller.
//!
//! # Responsibility
//! - Expose add/toggle/remove/clear-completed over display indices.
//! - Translate display indices into insertion positions for the store.
//! - Push the re-derived display order to an optional renderer.
//!
//! # Invariants
//! - Display order is recomputed from insertion order on every read.
//! - A rejected operation changes neither memory nor storage and does not
//!   trigger a render.
//! - Indices are positions in the display order current at call time.

use crate::config::StoreConfig;
use crate::model::todo_item::{Priority, TodoItem, TodoValidationError};
use crate::repo::todo_store::{LoadReport, StoreError, TodoStore};
use crate::service::ordering::{display_order, display_positions};
use crate::storage::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors surfaced to renderers.
#[derive(Debug)]
pub enum ControllerError {
    /// User input was rejected; nothing changed.
    Validation(TodoValidationError),
    /// Persistence failed; memory was rolled back to the stored state.
    Store(StoreError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<TodoValidationError> for ControllerError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// Receives the display order after load and after every mutation.
pub trait Renderer {
    fn render(&mut self, ordered: &[TodoItem]);
}

/// Item counts for status lines such as "3 items left".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Mutation API over one persisted list.
pub struct TodoListController<S: KeyValueStore> {
    store: TodoStore<S>,
    renderer: Option<Box<dyn Renderer>>,
}

impl<S: KeyValueStore> TodoListController<S> {
    pub fn new(store: TodoStore<S>) -> Self {
        Self {
            store,
            renderer: None,
        }
    }

    /// Opens the store under `config` and wraps it in a controller.
    pub fn open(kv: S, config: StoreConfig) -> ControllerResult<(Self, LoadReport)> {
        let (store, report) = TodoStore::open(kv, config)?;
        if report.is_recovery() {
            warn!("event=todo_list_open module=service status=recovered");
        }
        Ok((Self::new(store), report))
    }

    /// Installs a renderer and immediately renders the current order.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
        self.render();
    }

    /// Adds an incomplete item at the end of insertion order.
    ///
    /// # Errors
    /// - `Validation(EmptyText)` when `text` is blank; nothing is written.
    pub fn add_item(&mut self, text: &str, priority: Priority) -> ControllerResult<TodoItem> {
        let item = TodoItem::new(text, priority)?;
        self.store.append(item.clone())?;
        info!(
            "event=todo_add module=service status=ok priority={} count={}",
            priority,
            self.store.items().len()
        );
        self.render();
        Ok(item)
    }

    /// Parses `priority` (`high|medium|low`) then adds the item.
    pub fn add_item_str(&mut self, text: &str, priority: &str) -> ControllerResult<TodoItem> {
        let priority = priority.parse::<Priority>()?;
        self.add_item(text, priority)
    }

    /// Flips completion of the item at display `index`.
    ///
    /// Returns the item's display index after re-sorting. Toggling can move
    /// the item, in which case a second call with the same `index` targets a
    /// different item; calling again with the returned index restores the
    /// original flags and display order.
    pub fn toggle_completed(&mut self, index: usize) -> ControllerResult<usize> {
        let position = self.resolve(index)?;
        let completed = !self.store.items()[position].is_completed();
        self.store.set_completed(position, completed)?;

        let new_index = display_positions(self.store.items())
            .iter()
            .position(|&p| p == position)
            .unwrap_or(index);
        info!(
            "event=todo_toggle module=service status=ok index={index} new_index={new_index} completed={completed}"
        );
        self.render();
        Ok(new_index)
    }

    /// Removes and returns the item at display `index`.
    pub fn remove_item(&mut self, index: usize) -> ControllerResult<TodoItem> {
        let position = self.resolve(index)?;
        let removed = self.store.remove_at(position)?;
        info!(
            "event=todo_remove module=service status=ok index={index} count={}",
            self.store.items().len()
        );
        self.render();
        Ok(removed)
    }

    /// Removes every completed item in one write; returns how many went.
    pub fn clear_completed(&mut self) -> ControllerResult<usize> {
        let removed = self.store.retain(|item| !item.is_completed())?;
        info!(
            "event=todo_clear_completed module=service status=ok removed={removed} count={}",
            self.store.items().len()
        );
        self.render();
        Ok(removed)
    }

    /// Display-ordered copy of the list. Does not touch the store.
    pub fn current_order(&self) -> Vec<TodoItem> {
        display_order(self.store.items())
    }

    pub fn summary(&self) -> TodoSummary {
        let total = self.store.items().len();
        let completed = self
            .store
            .items()
            .iter()
            .filter(|item| item.is_completed())
            .count();
        TodoSummary {
            total,
            active: total - completed,
            completed,
        }
    }

    /// Underlying store, for insertion-order reads.
    pub fn store(&self) -> &TodoStore<S> {
        &self.store
    }

    fn resolve(&self, index: usize) -> Result<usize, TodoValidationError> {
        let items = self.store.items();
        display_positions(items)
            .get(index)
            .copied()
            .ok_or(TodoValidationError::IndexOutOfRange {
                index,
                len: items.len(),
            })
    }

    fn render(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&display_order(self.store.items()));
        }
    }
}
