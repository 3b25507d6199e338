//! Core domain logic for the todo store service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{TodoId, TodoItem, TodoValidationError, TODO_VALUE_MAX_CHARS};
pub use service::todo_service::{TodoService, TodoServiceError, UpdateTodoCommand};
pub use store::memory::MemoryTodoStore;
pub use store::todo_store::{SqliteTodoStore, StoreError, StoreResult, TodoStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
