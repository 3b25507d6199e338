//! In-memory todo store for tests and embedding without SQLite.
//!
//! Honors the same contract as the SQLite store: validation before every
//! write, `NotFound` on missing ids, `updated_at` refresh on mutation, and
//! all-or-nothing semantics for the pairwise swap.

use crate::model::todo::{now_epoch_ms, TodoId, TodoItem};
use crate::store::todo_store::{StoreError, StoreResult, TodoStore};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Map-backed fake honoring the [`TodoStore`] contract.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    items: RefCell<BTreeMap<TodoId, TodoItem>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored todos.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl TodoStore for MemoryTodoStore {
    fn create_todo(&self, todo: &TodoItem) -> StoreResult<TodoId> {
        todo.validate()?;
        self.items.borrow_mut().insert(todo.id, todo.clone());
        Ok(todo.id)
    }

    fn get_todo(&self, id: TodoId) -> StoreResult<Option<TodoItem>> {
        Ok(self.items.borrow().get(&id).cloned())
    }

    fn list_todos(&self) -> StoreResult<Vec<TodoItem>> {
        let mut todos: Vec<TodoItem> = self.items.borrow().values().cloned().collect();
        todos.sort_by(|a, b| b.order.cmp(&a.order).then(a.id.cmp(&b.id)));
        Ok(todos)
    }

    fn find_todo_by_order(&self, order: i64) -> StoreResult<Option<TodoItem>> {
        Ok(self
            .items
            .borrow()
            .values()
            .filter(|todo| todo.order == order)
            .min_by_key(|todo| todo.id)
            .cloned())
    }

    fn max_todo_order(&self) -> StoreResult<Option<i64>> {
        Ok(self.items.borrow().values().map(|todo| todo.order).max())
    }

    fn update_todo(&self, todo: &TodoItem) -> StoreResult<()> {
        todo.validate()?;

        let mut items = self.items.borrow_mut();
        if !items.contains_key(&todo.id) {
            return Err(StoreError::NotFound(todo.id));
        }

        let mut stored = todo.clone();
        stored.updated_at = now_epoch_ms();
        items.insert(stored.id, stored);
        Ok(())
    }

    fn update_todo_pair(&self, target: &TodoItem, partner: &TodoItem) -> StoreResult<()> {
        target.validate()?;
        partner.validate()?;

        let mut items = self.items.borrow_mut();
        // Both existence checks happen before either write.
        if !items.contains_key(&partner.id) {
            return Err(StoreError::NotFound(partner.id));
        }
        if !items.contains_key(&target.id) {
            return Err(StoreError::NotFound(target.id));
        }

        let now = now_epoch_ms();
        for todo in [partner, target] {
            let mut stored = todo.clone();
            stored.updated_at = now;
            items.insert(stored.id, stored);
        }
        Ok(())
    }

    fn delete_todo(&self, id: TodoId) -> StoreResult<()> {
        if self.items.borrow_mut().remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
