//! Shared request state.
//!
//! # Responsibility
//! - Own the single SQLite connection used by every request.
//! - Run one use-case per request on the blocking pool.
//!
//! # Invariants
//! - The connection lock is held for exactly one use-case call.
//! - Lock poisoning and task failures surface as `InternalServerError`.

use log::error;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use todo_core::{AppError, AppResult, SqliteTodoRepository, TodoService};

/// Service handle cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a connection returned by `todo_core::db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `use_case` against a service bound to the shared connection.
    pub async fn run<T, F>(&self, operation: &'static str, use_case: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&TodoService<SqliteTodoRepository<'conn>>) -> AppResult<T>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || -> AppResult<T> {
            let conn = db.lock().map_err(|_| {
                error!("event=http_state module=http status=error operation={operation} error=lock_poisoned");
                AppError::InternalServerError
            })?;
            let repo = SqliteTodoRepository::try_new(&conn).map_err(|err| {
                error!("event=http_state module=http status=error operation={operation} error={err}");
                AppError::InternalServerError
            })?;
            let service = TodoService::new(repo);
            use_case(&service)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(err) => {
                error!("event=http_state module=http status=error operation={operation} error={err}");
                Err(AppError::InternalServerError)
            }
        }
    }
}
