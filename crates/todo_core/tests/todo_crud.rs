use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection};
use todo_core::db::migrations::latest_version;
use todo_core::db::{open_db, open_db_in_memory, DbError};
use todo_core::{
    AppError, DueDate, ImplementationDate, Memo, Priority, SqliteTodoRepository, Status, Title,
    Todo, TodoId, TodoInput, TodoRepository, TodoService,
};

fn new_todo(title: &str, priority: Priority) -> Todo {
    Todo::uncreated(
        Title::new(title).unwrap(),
        ImplementationDate::new(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()).unwrap(),
        DueDate::new(Utc.with_ymd_and_hms(2024, 1, 5, 17, 30, 0).unwrap()).unwrap(),
        priority,
        Memo::new("note").unwrap(),
    )
}

#[test]
fn create_and_fetch_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let todo = new_todo("Buy milk", Priority::Low);
    let id = repo.create_todo(&todo).unwrap();
    let loaded = repo.fetch_todo_by_id(id).unwrap();

    assert_eq!(id.value(), 1);
    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.title(), todo.title());
    assert_eq!(loaded.implementation_date(), todo.implementation_date());
    assert_eq!(loaded.due_date(), todo.due_date());
    assert_eq!(loaded.status(), Status::Todo);
    assert_eq!(loaded.priority(), Priority::Low);
    assert_eq!(loaded.memo().value(), "note");
}

#[test]
fn fetch_missing_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo.fetch_todo_by_id(TodoId::new(12).unwrap()).unwrap_err();
    assert_eq!(err, AppError::TodoNotFound);
}

#[test]
fn fetch_todos_is_empty_then_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    assert!(repo.fetch_todos().unwrap().is_empty());

    repo.create_todo(&new_todo("b", Priority::High)).unwrap();
    repo.create_todo(&new_todo("a", Priority::Unknown)).unwrap();

    let titles: Vec<String> = repo
        .fetch_todos()
        .unwrap()
        .iter()
        .map(|todo| todo.title().value().to_string())
        .collect();
    assert_eq!(titles, vec!["b", "a"]);
}

#[test]
fn update_overwrites_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let id = repo.create_todo(&new_todo("draft", Priority::Low)).unwrap();

    let changed = Todo::reconstitute(
        id,
        Title::new("final").unwrap(),
        ImplementationDate::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()).unwrap(),
        DueDate::new(Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap()).unwrap(),
        Status::Done,
        Priority::Medium,
        Memo::new("").unwrap(),
    );
    assert_eq!(repo.update_todo(&changed).unwrap(), id);
    assert_eq!(repo.fetch_todo_by_id(id).unwrap(), changed);
}

#[test]
fn update_and_delete_missing_id_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let missing = TodoId::new(77).unwrap();

    let ghost = Todo::reconstitute(
        missing,
        Title::new("ghost").unwrap(),
        ImplementationDate::new(Utc::now()).unwrap(),
        DueDate::new(Utc::now()).unwrap(),
        Status::Doing,
        Priority::Low,
        Memo::new("").unwrap(),
    );
    assert_eq!(repo.update_todo(&ghost).unwrap_err(), AppError::TodoNotFound);
    assert_eq!(repo.delete_todo(missing).unwrap_err(), AppError::TodoNotFound);
    assert!(repo.fetch_todos().unwrap().is_empty());
}

#[test]
fn delete_twice_reports_not_found_second_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let id = repo.create_todo(&new_todo("once", Priority::Low)).unwrap();

    repo.delete_todo(id).unwrap();
    assert_eq!(repo.delete_todo(id).unwrap_err(), AppError::TodoNotFound);
}

#[test]
fn update_without_id_is_invalid_parameter() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo.update_todo(&new_todo("no id", Priority::Low)).unwrap_err();
    assert_eq!(err, AppError::InvalidParameter);
}

#[test]
fn corrupted_row_is_reported_as_internal_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let id = repo.create_todo(&new_todo("ok", Priority::Low)).unwrap();

    conn.execute(
        "UPDATE todos SET title = ?1 WHERE id = ?2;",
        params!["far too long for a title", id.value()],
    )
    .unwrap();

    assert_eq!(
        repo.fetch_todo_by_id(id).unwrap_err(),
        AppError::InternalServerError
    );
    assert_eq!(repo.fetch_todos().unwrap_err(), AppError::InternalServerError);
}

#[test]
fn service_over_sqlite_runs_full_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service
        .create_todo(&TodoInput {
            id: 0,
            title: "Buy milk".to_string(),
            implementation_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            status_id: 3,
            priority_id: 2,
            memo: String::new(),
        })
        .unwrap();
    assert_eq!((created.id, created.status_id, created.priority_id), (1, 1, 2));

    let updated = service
        .update_todo(&TodoInput {
            id: created.id,
            title: created.title.clone(),
            implementation_date: created.implementation_date,
            due_date: created.due_date,
            status_id: 2,
            priority_id: created.priority_id,
            memo: "started".to_string(),
        })
        .unwrap();
    assert_eq!(service.fetch_todo(created.id).unwrap(), updated);

    service.delete_todo(created.id).unwrap();
    assert!(service.fetch_todos().unwrap().is_empty());
}

#[test]
fn on_disk_database_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteTodoRepository::try_new(&conn).unwrap();
        repo.create_todo(&new_todo("persist", Priority::High)).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    assert_eq!(repo.fetch_todo_by_id(id).unwrap().title().value(), "persist");
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTodoRepository::try_new(&conn) {
        Err(DbError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_todos_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTodoRepository::try_new(&conn),
        Err(DbError::MissingRequiredTable("todos"))
    ));
}

#[test]
fn repository_rejects_todos_table_missing_memo_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todos (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            implementation_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            status_id INTEGER NOT NULL,
            priority_id INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTodoRepository::try_new(&conn),
        Err(DbError::MissingRequiredColumn {
            table: "todos",
            column: "memo"
        })
    ));
}
