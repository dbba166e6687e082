//! Process-local todo store.
//!
//! # Design
//! All state sits behind one `std::sync::Mutex`, so every operation (read or
//! write) is serialized across the whole collection. Nothing inside the lock
//! awaits, which is why a blocking mutex is used even under tokio.
//!
//! Reads hand out clones; callers can never observe or cause mutation of the
//! stored entries outside these methods. Deleted ids are never reissued.

use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::service::TodoService;
use crate::types::{CreateTodoRequest, DeleteTodoRequest, GetTodoByIdRequest, Todo, UpdateTodoRequest};

#[derive(Debug)]
struct Inner {
    next_id: i64,
    todos: Vec<Todo>,
}

impl Inner {
    fn position(&self, id: i64) -> Result<usize> {
        self.todos
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::todo_not_found(id))
    }
}

/// In-memory implementation of [`TodoService`].
#[derive(Debug)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                todos: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::internal("Todo store lock was poisoned."))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoService for InMemoryStore {
    fn create_todo(&self, request: &CreateTodoRequest) -> Result<Todo> {
        let mut inner = self.lock()?;
        let todo = Todo {
            id: inner.next_id,
            value: request.value.clone(),
            complete: false,
        };
        inner.next_id += 1;
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    fn update_todo(&self, request: &UpdateTodoRequest) -> Result<Todo> {
        let mut inner = self.lock()?;
        let idx = inner.position(request.id)?;
        let todo = &mut inner.todos[idx];
        todo.value.clone_from(&request.value);
        todo.complete = request.complete;
        Ok(todo.clone())
    }

    fn delete_todo(&self, request: &DeleteTodoRequest) -> Result<()> {
        let mut inner = self.lock()?;
        let idx = inner.position(request.id)?;
        // `remove` rather than `swap_remove`: listing stays in creation order.
        inner.todos.remove(idx);
        Ok(())
    }

    fn get_todo_by_id(&self, request: &GetTodoByIdRequest) -> Result<Todo> {
        let inner = self.lock()?;
        let idx = inner.position(request.id)?;
        Ok(inner.todos[idx].clone())
    }

    fn get_all_todos(&self) -> Result<Vec<Todo>> {
        Ok(self.lock()?.todos.clone())
    }
}
