//! To-do item domain model.
//!
//! # Responsibility
//! - Define `TodoItem` and its `Priority` scale.
//! - Validate user input before it becomes an item.
//!
//! # Invariants
//! - `text` is non-empty after trim.
//! - Only `completed` is mutable after construction.
//! - Wire names for priority are lowercase `high|medium|low`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Importance bucket used as the secondary display sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: lower ranks are displayed first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Stable lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoValidationError;

    /// Parses user input case-insensitively, ignoring surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(TodoValidationError::UnknownPriority(value.trim().to_string())),
        }
    }
}

/// Input validation failures. Always recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Item text is empty after trim.
    EmptyText,
    /// Priority name is not one of `high|medium|low`.
    UnknownPriority(String),
    /// Display index does not address an item.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "todo text must not be empty"),
            Self::UnknownPriority(value) => write!(
                f,
                "unknown priority `{value}`; expected high|medium|low"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for {len} item(s)")
            }
        }
    }
}

impl Error for TodoValidationError {}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TodoItemRecord")]
pub struct TodoItem {
    text: String,
    priority: Priority,
    completed: bool,
}

/// Persisted record shape. Older records omit `priority`; some omit
/// `completed` as well.
#[derive(Deserialize)]
struct TodoItemRecord {
    text: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<TodoItemRecord> for TodoItem {
    type Error = TodoValidationError;

    fn try_from(record: TodoItemRecord) -> Result<Self, Self::Error> {
        if record.text.trim().is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(Self {
            text: record.text,
            priority: record.priority,
            completed: record.completed,
        })
    }
}

impl TodoItem {
    /// Creates an incomplete item from raw user input.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is empty after trim.
    pub fn new(text: &str, priority: Priority) -> Result<Self, TodoValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(Self {
            text: trimmed.to_string(),
            priority,
            completed: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, TodoItem, TodoValidationError};

    #[test]
    fn new_trims_text_and_defaults_to_incomplete() {
        let item = TodoItem::new("  buy milk \n", Priority::High).unwrap();
        assert_eq!(item.text(), "buy milk");
        assert_eq!(item.priority(), Priority::High);
        assert!(!item.is_completed());
    }

    #[test]
    fn new_rejects_blank_text() {
        assert_eq!(
            TodoItem::new("   ", Priority::Low).unwrap_err(),
            TodoValidationError::EmptyText
        );
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(" HIGH ".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Low".parse::<Priority>().unwrap(), Priority::Low);
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err, TodoValidationError::UnknownPriority("urgent".into()));
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn toggle_flips_flag() {
        let mut item = TodoItem::new("walk", Priority::Medium).unwrap();
        assert!(item.toggle());
        assert!(!item.toggle());
    }
}
