//! In-memory todo repository.
//!
//! Same contract as the SQLite adapter, kept in process memory. Useful for
//! tests and for running the service without a database file.

use crate::error::{AppError, AppResult};
use crate::model::todo::Todo;
use crate::model::value::TodoId;
use crate::repo::todo_repo::TodoRepository;
use log::error;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct MemoryState {
    next_id: i64,
    rows: BTreeMap<TodoId, Todo>,
}

/// Thread-safe in-memory todo store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryTodoRepository {
    state: Mutex<MemoryState>,
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored todos.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |state| state.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| {
            error!("event=repo_failure module=repo status=error operation=lock error=poisoned");
            AppError::InternalServerError
        })
    }
}

fn with_id(id: TodoId, todo: &Todo) -> Todo {
    Todo::reconstitute(
        id,
        todo.title().clone(),
        todo.implementation_date(),
        todo.due_date(),
        todo.status(),
        todo.priority(),
        todo.memo().clone(),
    )
}

impl TodoRepository for InMemoryTodoRepository {
    fn create_todo(&self, todo: &Todo) -> AppResult<TodoId> {
        let mut state = self.lock()?;
        let id = TodoId::new(state.next_id).map_err(|_| AppError::InternalServerError)?;
        state.next_id += 1;
        state.rows.insert(id, with_id(id, todo));
        Ok(id)
    }

    fn fetch_todo_by_id(&self, id: TodoId) -> AppResult<Todo> {
        self.lock()?
            .rows
            .get(&id)
            .cloned()
            .ok_or(AppError::TodoNotFound)
    }

    fn fetch_todos(&self) -> AppResult<Vec<Todo>> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    fn update_todo(&self, todo: &Todo) -> AppResult<TodoId> {
        let id = todo.id().ok_or(AppError::InvalidParameter)?;
        let mut state = self.lock()?;
        match state.rows.get_mut(&id) {
            Some(slot) => {
                *slot = todo.clone();
                Ok(id)
            }
            None => Err(AppError::TodoNotFound),
        }
    }

    fn delete_todo(&self, id: TodoId) -> AppResult<()> {
        self.lock()?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::TodoNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryTodoRepository;
    use crate::error::AppError;
    use crate::model::todo::Todo;
    use crate::model::value::{DueDate, ImplementationDate, Memo, Priority, Title, TodoId};
    use crate::repo::todo_repo::TodoRepository;
    use chrono::{TimeZone, Utc};

    fn sample(title: &str) -> Todo {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Todo::uncreated(
            Title::new(title).unwrap(),
            ImplementationDate::new(at).unwrap(),
            DueDate::new(at).unwrap(),
            Priority::Low,
            Memo::new("").unwrap(),
        )
    }

    #[test]
    fn ids_are_assigned_sequentially_and_not_reused() {
        let repo = InMemoryTodoRepository::new();
        let first = repo.create_todo(&sample("a")).unwrap();
        repo.delete_todo(first).unwrap();
        let second = repo.create_todo(&sample("b")).unwrap();

        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn update_without_id_is_invalid_parameter() {
        let repo = InMemoryTodoRepository::new();
        let err = repo.update_todo(&sample("a")).unwrap_err();
        assert_eq!(err, AppError::InvalidParameter);
    }

    #[test]
    fn fetch_absent_id_is_not_found() {
        let repo = InMemoryTodoRepository::new();
        let err = repo.fetch_todo_by_id(TodoId::new(7).unwrap()).unwrap_err();
        assert_eq!(err, AppError::TodoNotFound);
        assert!(repo.is_empty());
    }
}
