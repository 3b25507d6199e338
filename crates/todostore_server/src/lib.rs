//! HTTP surface for the todo store service.
//!
//! # Responsibility
//! - Expose the four todo operations plus a liveness probe over axum routes.
//! - Translate wire payloads into core commands and core results into the
//!   `{todo}` / `{todos}` / `{}` response envelopes.
//!
//! # Invariants
//! - Handlers hold the connection mutex only for the duration of one
//!   synchronous store interaction.
//! - Every failure is rendered through [`error::ApiError`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use todostore_core::{
    core_version, SqliteTodoStore, TodoId, TodoItem, TodoService, UpdateTodoCommand,
};
use tokio::net::TcpListener;

pub mod config;
pub mod error;

use error::ApiError;

/// Shared per-process state: one SQLite connection behind a mutex.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

/// Request body for `POST /todos`.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub value: String,
}

/// Request body for `PATCH /todos/{todoId}`; every field optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateTodoResponse {
    todo: TodoItem,
}

#[derive(Debug, Serialize)]
struct ListTodosResponse {
    todos: Vec<TodoItem>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Builds the router over one migrated SQLite connection.
pub fn app(conn: Connection) -> Router {
    let state = AppState {
        conn: Arc::new(Mutex::new(conn)),
    };
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{todoId}", patch(update_todo).delete(delete_todo))
        .with_state(state)
}

/// Serves the app on an already-bound listener until the task is dropped.
pub async fn run(listener: TcpListener, conn: Connection) -> Result<(), std::io::Error> {
    axum::serve(listener, app(conn)).await
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;

    let conn = lock_connection(&state)?;
    let service = TodoService::new(SqliteTodoStore::try_new(&conn)?);
    let todo = service.create_todo(&request.value)?;

    Ok((StatusCode::CREATED, Json(CreateTodoResponse { todo })))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<ListTodosResponse>, ApiError> {
    let conn = lock_connection(&state)?;
    let service = TodoService::new(SqliteTodoStore::try_new(&conn)?);
    let todos = service.list_todos()?;

    Ok(Json(ListTodosResponse { todos }))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<TodoId>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(request) = payload?;

    let conn = lock_connection(&state)?;
    let service = TodoService::new(SqliteTodoStore::try_new(&conn)?);
    service.update_todo(
        todo_id,
        UpdateTodoCommand {
            order: request.order,
            done: request.done,
            value: request.value,
        },
    )?;

    Ok(Json(serde_json::json!({})))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<TodoId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = lock_connection(&state)?;
    let service = TodoService::new(SqliteTodoStore::try_new(&conn)?);
    service.delete_todo(todo_id)?;

    Ok(Json(serde_json::json!({})))
}

fn lock_connection(state: &AppState) -> Result<std::sync::MutexGuard<'_, Connection>, ApiError> {
    state
        .conn
        .lock()
        .map_err(|_| ApiError::Internal("database connection mutex poisoned".to_string()))
}
