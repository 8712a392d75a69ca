//! Repository contract and persistence adapters.
//!
//! # Responsibility
//! - Define the storage-agnostic contract consumed by use-cases.
//! - Provide SQLite and in-memory implementations of it.
//!
//! # Invariants
//! - Adapters return classified `AppError`s, never raw driver errors.
//! - Absent ids surface as `TodoNotFound` on fetch, update and delete.

pub mod memory_repo;
pub mod todo_repo;
