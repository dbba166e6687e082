//! The service contract implemented by the store and every decorator.
//!
//! # Design
//! Decorators hold their inner service by value and implement this same
//! trait, so a chain is built by nesting constructors. The blanket impl for
//! `Arc` lets a finished chain be shared across server workers as
//! `Arc<dyn TodoService>`.

use std::sync::Arc;

use crate::error::Result;
use crate::types::{CreateTodoRequest, DeleteTodoRequest, GetTodoByIdRequest, Todo, UpdateTodoRequest};

/// Operations available on a todo collection.
pub trait TodoService: Send + Sync {
    fn create_todo(&self, request: &CreateTodoRequest) -> Result<Todo>;

    fn update_todo(&self, request: &UpdateTodoRequest) -> Result<Todo>;

    fn delete_todo(&self, request: &DeleteTodoRequest) -> Result<()>;

    fn get_todo_by_id(&self, request: &GetTodoByIdRequest) -> Result<Todo>;

    /// Every stored todo, in creation order.
    fn get_all_todos(&self) -> Result<Vec<Todo>>;
}

/// Names reported by the decorators for each operation.
pub mod method {
    pub const CREATE_TODO: &str = "CreateTodo";
    pub const UPDATE_TODO: &str = "UpdateTodo";
    pub const DELETE_TODO: &str = "DeleteTodo";
    pub const GET_TODO_BY_ID: &str = "GetTodoByID";
    pub const GET_ALL_TODOS: &str = "GetAllTodos";
}

impl<S: TodoService + ?Sized> TodoService for Arc<S> {
    fn create_todo(&self, request: &CreateTodoRequest) -> Result<Todo> {
        (**self).create_todo(request)
    }

    fn update_todo(&self, request: &UpdateTodoRequest) -> Result<Todo> {
        (**self).update_todo(request)
    }

    fn delete_todo(&self, request: &DeleteTodoRequest) -> Result<()> {
        (**self).delete_todo(request)
    }

    fn get_todo_by_id(&self, request: &GetTodoByIdRequest) -> Result<Todo> {
        (**self).get_todo_by_id(request)
    }

    fn get_all_todos(&self) -> Result<Vec<Todo>> {
        (**self).get_all_todos()
    }
}
