//! Store layer abstraction and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract used by the todo service.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store writes must enforce `TodoItem::validate()` before persistence.
//! - Store APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod memory;
pub mod todo_store;
