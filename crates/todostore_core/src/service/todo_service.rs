//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the create/list/update/delete operations over one store.
//! - Assign dense-ish order values on create and swap them on reorder.
//!
//! # Invariants
//! - New todos take `order = max(order) + 1`, or 1 in an empty collection.
//! - `order` values stay unique at rest: a reorder targeting an occupied
//!   value swaps with the occupant inside one store transaction.
//! - `order == 0` in an update means "no reorder requested".

use crate::model::todo::{TodoId, TodoItem, TodoValidationError};
use crate::store::todo_store::{StoreError, TodoStore};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Input value violates the length bound.
    Validation(TodoValidationError),
    /// Target todo does not exist.
    TodoNotFound(TodoId),
    /// Persistence-layer failure.
    Store(StoreError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent todo state: {details}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TodoServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::TodoNotFound(id),
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Partial-update command for one todo.
///
/// Every field is independently optional; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTodoCommand {
    /// Requested order value. `Some(0)` is treated the same as `None`.
    pub order: Option<i64>,
    /// Completion toggle. `Some(true)` stamps now, `Some(false)` clears.
    pub done: Option<bool>,
    /// Replacement text. Empty strings are ignored.
    pub value: Option<String>,
}

/// Todo service facade over store implementations.
pub struct TodoService<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> TodoService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates one todo at the end of the display ordering.
    ///
    /// The value is trimmed and must be 1–50 characters afterwards.
    pub fn create_todo(&self, value: &str) -> Result<TodoItem, TodoServiceError> {
        let order = self.store.max_todo_order()?.map_or(1, |max| max + 1);
        let todo = TodoItem::new(value, order)?;

        let id = self.store.create_todo(&todo)?;
        let created = self
            .store
            .get_todo(id)?
            .ok_or(TodoServiceError::InconsistentState(
                "created todo not found in read-back",
            ))?;

        info!(
            "event=todo_create module=service status=ok id={} order={}",
            created.id, created.order
        );
        Ok(created)
    }

    /// Lists all todos sorted by `order` descending.
    pub fn list_todos(&self) -> Result<Vec<TodoItem>, TodoServiceError> {
        Ok(self.store.list_todos()?)
    }

    /// Applies reorder, completion toggle and content edit in that order,
    /// then persists the accumulated changes in one write.
    ///
    /// A reorder targeting an order value held by another todo swaps the two
    /// values; both rows are written atomically.
    pub fn update_todo(
        &self,
        id: TodoId,
        command: UpdateTodoCommand,
    ) -> Result<(), TodoServiceError> {
        let mut target = self
            .store
            .get_todo(id)?
            .ok_or(TodoServiceError::TodoNotFound(id))?;

        let mut partner: Option<TodoItem> = None;
        if let Some(order) = command.order {
            if order != 0 {
                let conflict = self
                    .store
                    .find_todo_by_order(order)?
                    .filter(|other| other.id != target.id);
                if let Some(mut other) = conflict {
                    other.order = target.order;
                    partner = Some(other);
                }
                target.order = order;
            }
        }

        if let Some(done) = command.done {
            target.set_done(done);
        }

        if let Some(value) = command.value {
            if !value.is_empty() {
                target.value = value.trim().to_string();
            }
        }

        match &partner {
            Some(partner) => self.store.update_todo_pair(&target, partner)?,
            None => self.store.update_todo(&target)?,
        }

        info!(
            "event=todo_update module=service status=ok id={} reordered={} swap_partner={}",
            target.id,
            command.order.is_some_and(|order| order != 0),
            partner
                .as_ref()
                .map_or_else(|| "none".to_string(), |other| other.id.to_string())
        );
        Ok(())
    }

    /// Permanently removes one todo. Surviving order values keep their gaps.
    pub fn delete_todo(&self, id: TodoId) -> Result<(), TodoServiceError> {
        self.store.delete_todo(id)?;
        info!("event=todo_delete module=service status=ok id={id}");
        Ok(())
    }
}
