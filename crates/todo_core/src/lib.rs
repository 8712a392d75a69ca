//! Core domain and use-case logic for the todo service.
//! This crate is the single source of truth for todo invariants.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use error::{AppError, AppResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::Todo;
pub use model::value::{
    DueDate, ImplementationDate, Memo, Priority, Rule, Status, Title, TodoId, ValueError,
    TITLE_MAX_CHARS,
};
pub use repo::memory_repo::InMemoryTodoRepository;
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use service::dto::{TodoInput, TodoOutput};
pub use service::todo_service::TodoService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
