//! Todo store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `todos` collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `TodoItem::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `display_order` is unique at rest; `update_todo_pair` is the only write
//!   allowed to hold a transient duplicate, inside one transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::todo::{TodoId, TodoItem, TodoValidationError};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    id,
    value,
    display_order,
    done_at,
    created_at,
    updated_at
FROM todos";

pub type StoreResult<T> = Result<T, StoreError>;

/// Generic store error for todo persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "todo store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "todo store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "todo store requires column `{column}` in table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for StoreError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for todo CRUD and ordering queries.
pub trait TodoStore {
    fn create_todo(&self, todo: &TodoItem) -> StoreResult<TodoId>;
    fn get_todo(&self, id: TodoId) -> StoreResult<Option<TodoItem>>;
    /// Lists all todos sorted by `order` descending.
    fn list_todos(&self) -> StoreResult<Vec<TodoItem>>;
    /// Finds the todo currently holding the given order value, if any.
    fn find_todo_by_order(&self, order: i64) -> StoreResult<Option<TodoItem>>;
    /// Returns the highest order value in the collection, `None` when empty.
    fn max_todo_order(&self) -> StoreResult<Option<i64>>;
    fn update_todo(&self, todo: &TodoItem) -> StoreResult<()>;
    /// Persists both sides of a reorder swap in one atomic transaction.
    fn update_todo_pair(&self, target: &TodoItem, partner: &TodoItem) -> StoreResult<()>;
    fn delete_todo(&self, id: TodoId) -> StoreResult<()>;
}

/// SQLite-backed todo store.
pub struct SqliteTodoStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_todo_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoStore for SqliteTodoStore<'_> {
    fn create_todo(&self, todo: &TodoItem) -> StoreResult<TodoId> {
        todo.validate()?;

        self.conn.execute(
            "INSERT INTO todos (
                id,
                value,
                display_order,
                done_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                todo.id.to_string(),
                todo.value.as_str(),
                todo.order,
                todo.done_at,
                todo.created_at,
                todo.updated_at,
            ],
        )?;

        Ok(todo.id)
    }

    fn get_todo(&self, id: TodoId) -> StoreResult<Option<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_todos(&self) -> StoreResult<Vec<TodoItem>> {
        // The id tie-breaker only matters inside the transient-duplicate
        // window of a reorder; at rest orders are unique.
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} ORDER BY display_order DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn find_todo_by_order(&self, order: i64) -> StoreResult<Option<TodoItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} WHERE display_order = ?1 ORDER BY id ASC LIMIT 1;"
        ))?;

        let mut rows = stmt.query([order])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn max_todo_order(&self) -> StoreResult<Option<i64>> {
        let max: Option<i64> = self
            .conn
            .query_row("SELECT MAX(display_order) FROM todos;", [], |row| {
                row.get(0)
            })?;
        Ok(max)
    }

    fn update_todo(&self, todo: &TodoItem) -> StoreResult<()> {
        todo.validate()?;
        update_todo_row(self.conn, todo)
    }

    fn update_todo_pair(&self, target: &TodoItem, partner: &TodoItem) -> StoreResult<()> {
        target.validate()?;
        partner.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        update_todo_row(&tx, partner)?;
        update_todo_row(&tx, target)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_todo(&self, id: TodoId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}

fn update_todo_row(conn: &Connection, todo: &TodoItem) -> StoreResult<()> {
    let changed = conn.execute(
        "UPDATE todos
         SET
            value = ?1,
            display_order = ?2,
            done_at = ?3,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?4;",
        params![
            todo.value.as_str(),
            todo.order,
            todo.done_at,
            todo.id.to_string(),
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(todo.id));
    }

    Ok(())
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<TodoItem> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{id_text}` in todos.id")))?;

    let todo = TodoItem {
        id,
        value: row.get("value")?,
        order: row.get("display_order")?,
        done_at: row.get("done_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    todo.validate()?;
    Ok(todo)
}

fn ensure_todo_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "todos")? {
        return Err(StoreError::MissingRequiredTable("todos"));
    }

    for column in [
        "id",
        "value",
        "display_order",
        "done_at",
        "created_at",
        "updated_at",
    ] {
        if !table_has_column(conn, "todos", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "todos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
