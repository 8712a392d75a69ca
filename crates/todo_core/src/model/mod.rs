//! Todo domain model.
//!
//! # Responsibility
//! - Define value objects that validate each primitive field.
//! - Compose them into the `Todo` aggregate.
//!
//! # Invariants
//! - A `Todo` can only be built from already-validated value objects.

pub mod todo;
pub mod value;
