//! Classified application errors.
//!
//! # Responsibility
//! - Define the closed set of failures visible at the core boundary.
//! - Carry the transport status code consumed by adaptation layers.
//!
//! # Invariants
//! - Matching is by kind; two errors of the same kind are equal.
//! - Anything that cannot be classified is `InternalServerError`.

use crate::db::DbError;
use crate::model::value::ValueError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AppResult<T> = Result<T, AppError>;

/// Closed failure taxonomy shared by the repository and use-case layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppError {
    /// Malformed or out-of-range caller input.
    InvalidParameter,
    /// No stored todo matches the requested identifier.
    TodoNotFound,
    /// Persistence or unexpected failure.
    InternalServerError,
}

impl AppError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidParameter => "InvalidParameter",
            Self::TodoNotFound => "TodoNotFound",
            Self::InternalServerError => "InternalServerError",
        }
    }

    /// HTTP status associated with this kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidParameter => 400,
            Self::TodoNotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    /// Finds an `AppError` in `err` or its source chain.
    ///
    /// Falls back to `InternalServerError` when none is present.
    pub fn classify(err: &(dyn Error + 'static)) -> Self {
        let mut current = Some(err);
        while let Some(candidate) = current {
            if let Some(app_error) = candidate.downcast_ref::<AppError>() {
                return *app_error;
            }
            current = candidate.source();
        }
        Self::InternalServerError
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Error for AppError {}

impl From<ValueError> for AppError {
    fn from(_: ValueError) -> Self {
        Self::InvalidParameter
    }
}

impl From<DbError> for AppError {
    fn from(_: DbError) -> Self {
        Self::InternalServerError
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(_: rusqlite::Error) -> Self {
        Self::InternalServerError
    }
}
