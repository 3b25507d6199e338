//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod todo_service;
