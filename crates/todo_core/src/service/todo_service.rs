//! Todo use-case service.
//!
//! # Responsibility
//! - Turn raw DTO input into validated aggregates.
//! - Sequence repository calls and project results into output DTOs.
//!
//! # Invariants
//! - Validation failures become `InvalidParameter` before any repository call.
//! - Repository errors are returned unchanged.
//! - Create reads the stored row back; update returns its own aggregate.

use crate::error::{AppError, AppResult};
use crate::model::todo::Todo;
use crate::model::value::{
    DueDate, ImplementationDate, Memo, Priority, Status, Title, TodoId, ValueError,
};
use crate::repo::todo_repo::TodoRepository;
use crate::service::dto::{TodoInput, TodoOutput};
use log::{debug, info};

/// Use-case facade over a todo repository.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a todo and returns the stored row.
    ///
    /// # Contract
    /// - `input.status_id` is ignored; new todos start as `Status::Todo`.
    /// - The response comes from a fresh `fetch_todo_by_id`, so a concurrent
    ///   delete between the two calls surfaces as `TodoNotFound`.
    pub fn create_todo(&self, input: &TodoInput) -> AppResult<TodoOutput> {
        let todo = Todo::uncreated(
            validated("title", Title::new(input.title.as_str()))?,
            validated(
                "implementationDate",
                ImplementationDate::new(input.implementation_date),
            )?,
            validated("dueDate", DueDate::new(input.due_date))?,
            validated("priorityID", Priority::new(input.priority_id))?,
            validated("memo", Memo::new(input.memo.as_str()))?,
        );

        let id = self.repo.create_todo(&todo)?;
        let stored = self.repo.fetch_todo_by_id(id)?;
        info!("event=todo_create module=service status=ok id={id}");
        Ok(TodoOutput::from(&stored))
    }

    /// Loads one todo by raw id.
    pub fn fetch_todo(&self, raw_id: i64) -> AppResult<TodoOutput> {
        let id = validated("id", TodoId::new(raw_id))?;
        let todo = self.repo.fetch_todo_by_id(id)?;
        Ok(TodoOutput::from(&todo))
    }

    /// Loads all todos in repository order.
    pub fn fetch_todos(&self) -> AppResult<Vec<TodoOutput>> {
        let todos = self.repo.fetch_todos()?;
        Ok(todos.iter().map(TodoOutput::from).collect())
    }

    /// Overwrites every field of an existing todo.
    ///
    /// # Contract
    /// - Accepts an explicit status, unlike create.
    /// - Returns the projection of the submitted aggregate without a
    ///   read-back.
    pub fn update_todo(&self, input: &TodoInput) -> AppResult<TodoOutput> {
        let todo = Todo::reconstitute(
            validated("id", TodoId::new(input.id))?,
            validated("title", Title::new(input.title.as_str()))?,
            validated(
                "implementationDate",
                ImplementationDate::new(input.implementation_date),
            )?,
            validated("dueDate", DueDate::new(input.due_date))?,
            validated("statusID", Status::new(input.status_id))?,
            validated("priorityID", Priority::new(input.priority_id))?,
            validated("memo", Memo::new(input.memo.as_str()))?,
        );

        let id = self.repo.update_todo(&todo)?;
        info!("event=todo_update module=service status=ok id={id}");
        Ok(TodoOutput::from(&todo))
    }

    /// Deletes one todo by raw id.
    pub fn delete_todo(&self, raw_id: i64) -> AppResult<()> {
        let id = validated("id", TodoId::new(raw_id))?;
        self.repo.delete_todo(id)?;
        info!("event=todo_delete module=service status=ok id={id}");
        Ok(())
    }
}

fn validated<T>(field: &str, result: Result<T, ValueError>) -> AppResult<T> {
    result.map_err(|err| {
        debug!("event=validation module=service status=rejected field={field} reason={err}");
        AppError::InvalidParameter
    })
}
