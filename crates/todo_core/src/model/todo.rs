//! Todo aggregate.
//!
//! # Responsibility
//! - Hold one consistent snapshot of a todo's fields.
//! - Force the initial status for todos that were never persisted.
//!
//! # Invariants
//! - `Todo::uncreated` always yields `Status::Todo` and no id.
//! - The aggregate has no mutators; a change is a new aggregate.

use super::value::{DueDate, ImplementationDate, Memo, Priority, Status, Title, TodoId};

/// Todo entity composed from validated value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: Option<TodoId>,
    title: Title,
    implementation_date: ImplementationDate,
    due_date: DueDate,
    status: Status,
    priority: Priority,
    memo: Memo,
}

impl Todo {
    /// Builds a todo that has not been stored yet.
    ///
    /// Status is not caller-controlled here; new todos always start as
    /// `Status::Todo`.
    pub fn uncreated(
        title: Title,
        implementation_date: ImplementationDate,
        due_date: DueDate,
        priority: Priority,
        memo: Memo,
    ) -> Self {
        Self {
            id: None,
            title,
            implementation_date,
            due_date,
            status: Status::Todo,
            priority,
            memo,
        }
    }

    /// Rebuilds a todo from all of its fields.
    ///
    /// Used when reading rows back from storage and when preparing updates.
    pub fn reconstitute(
        id: TodoId,
        title: Title,
        implementation_date: ImplementationDate,
        due_date: DueDate,
        status: Status,
        priority: Priority,
        memo: Memo,
    ) -> Self {
        Self {
            id: Some(id),
            title,
            implementation_date,
            due_date,
            status,
            priority,
            memo,
        }
    }

    /// Storage id, `None` until the repository assigns one.
    pub fn id(&self) -> Option<TodoId> {
        self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn implementation_date(&self) -> ImplementationDate {
        self.implementation_date
    }

    pub fn due_date(&self) -> DueDate {
        self.due_date
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }
}
