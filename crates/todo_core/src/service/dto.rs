//! Data-transfer shapes crossing the use-case boundary.
//!
//! # Invariants
//! - Wire names are `id`, `title`, `implementationDate`, `dueDate`,
//!   `statusID`, `priorityID`, `memo`.
//! - Timestamps serialize as RFC 3339.

use crate::model::todo::Todo;
use crate::model::value::{
    DueDate, ImplementationDate, Memo, Priority, Status, Title, TodoId, ValueError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw todo payload accepted by create and update.
///
/// `id` is only meaningful for update; `status_id` is ignored by create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoInput {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "implementationDate")]
    pub implementation_date: DateTime<Utc>,
    #[serde(rename = "dueDate")]
    pub due_date: DateTime<Utc>,
    #[serde(rename = "statusID", default)]
    pub status_id: u32,
    #[serde(rename = "priorityID", default)]
    pub priority_id: u32,
    #[serde(default)]
    pub memo: String,
}

/// Todo projection returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoOutput {
    pub id: i64,
    pub title: String,
    #[serde(rename = "implementationDate")]
    pub implementation_date: DateTime<Utc>,
    #[serde(rename = "dueDate")]
    pub due_date: DateTime<Utc>,
    #[serde(rename = "statusID")]
    pub status_id: u32,
    #[serde(rename = "priorityID")]
    pub priority_id: u32,
    pub memo: String,
}

impl From<&Todo> for TodoOutput {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id().map_or(0, TodoId::value),
            title: todo.title().value().to_string(),
            implementation_date: todo.implementation_date().value(),
            due_date: todo.due_date().value(),
            status_id: todo.status().value(),
            priority_id: todo.priority().value(),
            memo: todo.memo().value().to_string(),
        }
    }
}

impl TryFrom<&TodoOutput> for Todo {
    type Error = ValueError;

    fn try_from(output: &TodoOutput) -> Result<Self, Self::Error> {
        Ok(Todo::reconstitute(
            TodoId::new(output.id)?,
            Title::new(output.title.as_str())?,
            ImplementationDate::new(output.implementation_date)?,
            DueDate::new(output.due_date)?,
            Status::new(output.status_id)?,
            Priority::new(output.priority_id)?,
            Memo::new(output.memo.as_str())?,
        ))
    }
}
