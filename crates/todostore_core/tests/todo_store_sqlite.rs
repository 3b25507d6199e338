use rusqlite::Connection;
use todostore_core::db::migrations::latest_version;
use todostore_core::db::open_db_in_memory;
use todostore_core::{SqliteTodoStore, StoreError, TodoItem, TodoStore};
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let todo = TodoItem::new("first todo", 1).unwrap();
    let id = store.create_todo(&todo).unwrap();

    let loaded = store.get_todo(id).unwrap().unwrap();
    assert_eq!(loaded, todo);
}

#[test]
fn get_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    assert!(store.get_todo(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn list_sorts_by_order_descending() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    for (value, order) in [("low", 1), ("high", 3), ("mid", 2)] {
        store
            .create_todo(&TodoItem::new(value, order).unwrap())
            .unwrap();
    }

    let listed = store.list_todos().unwrap();
    let orders: Vec<i64> = listed.iter().map(|todo| todo.order).collect();
    assert_eq!(orders, vec![3, 2, 1]);
}

#[test]
fn max_todo_order_tracks_highest_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    assert_eq!(store.max_todo_order().unwrap(), None);

    store
        .create_todo(&TodoItem::new("a", 4).unwrap())
        .unwrap();
    store
        .create_todo(&TodoItem::new("b", 9).unwrap())
        .unwrap();

    assert_eq!(store.max_todo_order().unwrap(), Some(9));
}

#[test]
fn find_todo_by_order_matches_exactly() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let todo = TodoItem::new("target", 5).unwrap();
    store.create_todo(&todo).unwrap();

    let found = store.find_todo_by_order(5).unwrap().unwrap();
    assert_eq!(found.id, todo.id);
    assert!(store.find_todo_by_order(6).unwrap().is_none());
}

#[test]
fn update_persists_changes_and_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let mut todo = TodoItem::new("draft", 1).unwrap();
    store.create_todo(&todo).unwrap();

    // Force a visibly stale updated_at so the SQL-side refresh is observable.
    conn.execute("UPDATE todos SET updated_at = 0;", []).unwrap();

    todo.value = "final".to_string();
    todo.set_done(true);
    store.update_todo(&todo).unwrap();

    let loaded = store.get_todo(todo.id).unwrap().unwrap();
    assert_eq!(loaded.value, "final");
    assert!(loaded.done_at.is_some());
    assert!(loaded.updated_at > 0);
}

#[test]
fn update_unknown_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let todo = TodoItem::new("missing", 1).unwrap();
    let err = store.update_todo(&todo).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == todo.id));
}

#[test]
fn update_todo_pair_swaps_orders_atomically() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let mut a = TodoItem::new("a", 1).unwrap();
    let mut b = TodoItem::new("b", 2).unwrap();
    store.create_todo(&a).unwrap();
    store.create_todo(&b).unwrap();

    a.order = 2;
    b.order = 1;
    store.update_todo_pair(&a, &b).unwrap();

    assert_eq!(store.get_todo(a.id).unwrap().unwrap().order, 2);
    assert_eq!(store.get_todo(b.id).unwrap().unwrap().order, 1);
}

#[test]
fn update_todo_pair_rolls_back_when_partner_is_missing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let mut target = TodoItem::new("target", 1).unwrap();
    store.create_todo(&target).unwrap();

    let mut phantom = TodoItem::new("phantom", 2).unwrap();
    phantom.order = 1;
    target.order = 2;

    let err = store.update_todo_pair(&target, &phantom).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == phantom.id));

    // The target write never happened.
    assert_eq!(store.get_todo(target.id).unwrap().unwrap().order, 1);
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let mut invalid = TodoItem::new("valid at first", 1).unwrap();
    invalid.value = "a".repeat(51);
    let create_err = store.create_todo(&invalid).unwrap_err();
    assert!(matches!(create_err, StoreError::Validation(_)));
    assert!(store.get_todo(invalid.id).unwrap().is_none());

    let mut stored = TodoItem::new("stored", 1).unwrap();
    store.create_todo(&stored).unwrap();
    stored.value = String::new();
    let update_err = store.update_todo(&stored).unwrap_err();
    assert!(matches!(update_err, StoreError::Validation(_)));
}

#[test]
fn delete_removes_row_and_reports_not_found_afterwards() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::try_new(&conn).unwrap();

    let todo = TodoItem::new("ephemeral", 1).unwrap();
    store.create_todo(&todo).unwrap();

    store.delete_todo(todo.id).unwrap();
    assert!(store.get_todo(todo.id).unwrap().is_none());

    let err = store.delete_todo(todo.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == todo.id));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteTodoStore::try_new(&conn);
    match result {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_required_todos_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("todos"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_todos_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todos (
            id TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            done_at INTEGER
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "todos",
            column: "display_order"
        })
    ));
}
