//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the persistence boundary the use-case layer depends on.
//! - Keep SQL details inside the core persistence adapter.
//!
//! # Invariants
//! - Every failure leaves this module as a classified `AppError`.
//! - `update_todo`/`delete_todo` on an absent id return `TodoNotFound`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{DbError, DbResult};
use crate::error::{AppError, AppResult};
use crate::model::todo::Todo;
use crate::model::value::{
    DueDate, ImplementationDate, Memo, Priority, Status, Title, TodoId, ValueError,
};
use chrono::{DateTime, Utc};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    todos.id AS id,
    todos.title AS title,
    todos.implementation_date AS implementation_date,
    todos.due_date AS due_date,
    todos.status_id AS status_id,
    todos.priority_id AS priority_id,
    todos.memo AS memo
FROM todos
INNER JOIN statuses ON statuses.id = todos.status_id
INNER JOIN priorities ON priorities.id = todos.priority_id";

const REQUIRED_TODO_COLUMNS: &[&str] = &[
    "id",
    "title",
    "implementation_date",
    "due_date",
    "status_id",
    "priority_id",
    "memo",
];

/// Persistence contract for todos.
pub trait TodoRepository {
    /// Stores a new row and returns the assigned id. The aggregate id is ignored.
    fn create_todo(&self, todo: &Todo) -> AppResult<TodoId>;
    /// Loads one todo, or `TodoNotFound`.
    fn fetch_todo_by_id(&self, id: TodoId) -> AppResult<Todo>;
    /// Loads every todo ordered by id. Empty when none exist.
    fn fetch_todos(&self) -> AppResult<Vec<Todo>>;
    /// Overwrites all mutable fields of the row matching `todo.id()`.
    fn update_todo(&self, todo: &Todo) -> AppResult<TodoId>;
    /// Removes the row, or `TodoNotFound` when it is already absent.
    fn delete_todo(&self, id: TodoId) -> AppResult<()>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for &R {
    fn create_todo(&self, todo: &Todo) -> AppResult<TodoId> {
        (**self).create_todo(todo)
    }

    fn fetch_todo_by_id(&self, id: TodoId) -> AppResult<Todo> {
        (**self).fetch_todo_by_id(id)
    }

    fn fetch_todos(&self) -> AppResult<Vec<Todo>> {
        (**self).fetch_todos()
    }

    fn update_todo(&self, todo: &Todo) -> AppResult<TodoId> {
        (**self).update_todo(todo)
    }

    fn delete_todo(&self, id: TodoId) -> AppResult<()> {
        (**self).delete_todo(id)
    }
}

/// Adapter-internal failure, classified before leaving the repository.
#[derive(Debug)]
enum StoreError {
    Sqlite(rusqlite::Error),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

type StoreResult<T> = Result<T, StoreError>;

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for a foreign schema.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn insert(&self, todo: &Todo) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO todos (
                title,
                implementation_date,
                due_date,
                status_id,
                priority_id,
                memo
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                todo.title().value(),
                todo.implementation_date().value(),
                todo.due_date().value(),
                todo.status().value(),
                todo.priority().value(),
                todo.memo().value(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn select_one(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE todos.id = ?1;"))?;
        let mut rows = stmt.query([id.value()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_todo_row(row)?)),
            None => Ok(None),
        }
    }

    fn select_all(&self) -> StoreResult<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY todos.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn overwrite(&self, id: TodoId, todo: &Todo) -> StoreResult<usize> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                title = ?1,
                implementation_date = ?2,
                due_date = ?3,
                status_id = ?4,
                priority_id = ?5,
                memo = ?6
             WHERE id = ?7;",
            params![
                todo.title().value(),
                todo.implementation_date().value(),
                todo.due_date().value(),
                todo.status().value(),
                todo.priority().value(),
                todo.memo().value(),
                id.value(),
            ],
        )?;
        Ok(changed)
    }

    fn remove(&self, id: TodoId) -> StoreResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id.value()])?;
        Ok(changed)
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &Todo) -> AppResult<TodoId> {
        let raw_id = self.insert(todo).map_err(|err| internal("create_todo", err))?;
        TodoId::new(raw_id).map_err(|err| internal("create_todo", err))
    }

    fn fetch_todo_by_id(&self, id: TodoId) -> AppResult<Todo> {
        match self.select_one(id) {
            Ok(Some(todo)) => Ok(todo),
            Ok(None) => {
                debug!("event=todo_fetch module=repo status=not_found id={id}");
                Err(AppError::TodoNotFound)
            }
            Err(err) => Err(internal("fetch_todo_by_id", err)),
        }
    }

    fn fetch_todos(&self) -> AppResult<Vec<Todo>> {
        self.select_all().map_err(|err| internal("fetch_todos", err))
    }

    fn update_todo(&self, todo: &Todo) -> AppResult<TodoId> {
        let Some(id) = todo.id() else {
            return Err(AppError::InvalidParameter);
        };

        match self.overwrite(id, todo) {
            Ok(0) => Err(AppError::TodoNotFound),
            Ok(_) => Ok(id),
            Err(err) => Err(internal("update_todo", err)),
        }
    }

    fn delete_todo(&self, id: TodoId) -> AppResult<()> {
        match self.remove(id) {
            Ok(0) => Err(AppError::TodoNotFound),
            Ok(_) => Ok(()),
            Err(err) => Err(internal("delete_todo", err)),
        }
    }
}

fn internal(operation: &str, err: impl Display) -> AppError {
    error!(
        "event=repo_failure module=repo status=error operation={} error={}",
        operation, err
    );
    AppError::InternalServerError
}

fn ensure_connection_ready(conn: &Connection) -> DbResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'todos');",
        [],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(DbError::MissingRequiredTable("todos"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(todos);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    for required in REQUIRED_TODO_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(DbError::MissingRequiredColumn {
                table: "todos",
                column: required,
            });
        }
    }

    Ok(())
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<Todo> {
    let id = TodoId::new(row.get("id")?).map_err(invalid_data("todos.id"))?;
    let title = Title::new(row.get::<_, String>("title")?).map_err(invalid_data("todos.title"))?;
    let implementation_date =
        ImplementationDate::new(row.get::<_, DateTime<Utc>>("implementation_date")?)
            .map_err(invalid_data("todos.implementation_date"))?;
    let due_date = DueDate::new(row.get::<_, DateTime<Utc>>("due_date")?)
        .map_err(invalid_data("todos.due_date"))?;
    let status = Status::new(row.get("status_id")?).map_err(invalid_data("todos.status_id"))?;
    let priority =
        Priority::new(row.get("priority_id")?).map_err(invalid_data("todos.priority_id"))?;
    let memo = Memo::new(row.get::<_, String>("memo")?).map_err(invalid_data("todos.memo"))?;

    Ok(Todo::reconstitute(
        id,
        title,
        implementation_date,
        due_date,
        status,
        priority,
        memo,
    ))
}

fn invalid_data(column: &'static str) -> impl Fn(ValueError) -> StoreError {
    move |err| StoreError::InvalidData(format!("{err} in {column}"))
}
