//! Domain model for the todo store.
//!
//! # Responsibility
//! - Define the canonical todo record shared by storage and services.
//! - Keep value validation rules next to the data they protect.
//!
//! # Invariants
//! - Every todo is identified by a stable `TodoId`.
//! - Completion state is encoded solely by the presence of `done_at`.

pub mod todo;
