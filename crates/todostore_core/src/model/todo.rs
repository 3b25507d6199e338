//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record persisted by the store.
//! - Provide value validation and completion lifecycle helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another todo.
//! - `value` is trimmed and 1–50 characters long on every persisted record.
//! - `done_at` is the sole completion indicator; no separate boolean exists.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Maximum accepted length of `value`, counted in `char`s after trimming.
pub const TODO_VALUE_MAX_CHARS: usize = 50;

/// Stable identifier for one todo item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = Uuid;

/// Validation failures for todo content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// `value` is empty after trimming.
    EmptyValue,
    /// `value` exceeds the maximum accepted length.
    ValueTooLong { length: usize, max: usize },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue => write!(f, "todo value must not be empty"),
            Self::ValueTooLong { length, max } => {
                write!(f, "todo value is {length} characters long, maximum is {max}")
            }
        }
    }
}

impl Error for TodoValidationError {}

/// Canonical todo record.
///
/// Serialized field names are camelCase to match the wire document layout;
/// `order` is stored under the `display_order` column because `order` is an
/// SQL keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Stable global ID used for lookup and delete.
    pub id: TodoId,
    /// User-facing text, trimmed, 1–50 characters.
    pub value: String,
    /// Display ordering key; unique across the collection at rest.
    pub order: i64,
    /// Unix epoch milliseconds of completion. `None` means not completed.
    pub done_at: Option<i64>,
    /// Unix epoch milliseconds of creation. Immutable.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last persisted mutation.
    pub updated_at: i64,
}

impl TodoItem {
    /// Creates a new, not-completed todo with a generated stable ID.
    ///
    /// The value is trimmed before validation and storage.
    ///
    /// # Errors
    /// - Returns `TodoValidationError` when the trimmed value is empty or
    ///   longer than [`TODO_VALUE_MAX_CHARS`].
    pub fn new(value: impl Into<String>, order: i64) -> Result<Self, TodoValidationError> {
        Self::with_id(Uuid::new_v4(), value, order)
    }

    /// Creates a new todo with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: TodoId,
        value: impl Into<String>,
        order: i64,
    ) -> Result<Self, TodoValidationError> {
        let now = now_epoch_ms();
        let todo = Self {
            id,
            value: value.into().trim().to_string(),
            order,
            done_at: None,
            created_at: now,
            updated_at: now,
        };
        todo.validate()?;
        Ok(todo)
    }

    /// Validates the length bound on `value`.
    ///
    /// Write paths must call this before SQL mutations; read paths use it to
    /// reject invalid persisted state instead of masking it.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.value.trim().is_empty() {
            return Err(TodoValidationError::EmptyValue);
        }
        let length = self.value.chars().count();
        if length > TODO_VALUE_MAX_CHARS {
            return Err(TodoValidationError::ValueTooLong {
                length,
                max: TODO_VALUE_MAX_CHARS,
            });
        }
        Ok(())
    }

    /// Sets or clears the completion timestamp.
    ///
    /// `done == true` always stamps the current instant, even when the todo
    /// is already completed.
    pub fn set_done(&mut self, done: bool) {
        self.done_at = done.then(now_epoch_ms);
    }

    /// Returns whether this todo is completed.
    pub fn is_done(&self) -> bool {
        self.done_at.is_some()
    }
}

/// Returns the current time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
