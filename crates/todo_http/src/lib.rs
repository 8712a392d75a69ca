//! HTTP adaptation layer for the todo service.
//!
//! # Responsibility
//! - Map routes onto `todo_core` use-cases.
//! - Render DTOs and classified errors as JSON.
//!
//! # Invariants
//! - Handlers never touch SQL; they only call `TodoService`.
//! - Every error response carries the status of its `AppError` kind.

pub mod cors;
pub mod presenter;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
