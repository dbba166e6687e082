use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::service::{method, TodoService};
use crate::types::{CreateTodoRequest, DeleteTodoRequest, GetTodoByIdRequest, Todo, UpdateTodoRequest};

/// Emits one `tracing` event per call, after the inner service returns.
///
/// Successful calls log at INFO and failed calls at WARN. Every event carries
/// `method`, `took` and `err` plus whichever request fields the call takes;
/// `err` is `"none"` on success.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware<S> {
    next: S,
}

impl<S: TodoService> LoggingMiddleware<S> {
    pub fn new(next: S) -> Self {
        Self { next }
    }
}

fn err_field<T>(result: &Result<T>) -> Option<&str> {
    result.as_ref().err().map(Error::message)
}

macro_rules! log_call {
    ($result:expr, $took:expr, $method:expr $(, $field:ident = $value:expr)* $(,)?) => {{
        let result = &$result;
        let took: Duration = $took;
        match err_field(result) {
            None => tracing::info!(
                method = $method,
                $($field = $value,)*
                took = ?took,
                err = "none"
            ),
            Some(err) => tracing::warn!(
                method = $method,
                $($field = $value,)*
                took = ?took,
                err = err
            ),
        }
    }};
}

impl<S: TodoService> TodoService for LoggingMiddleware<S> {
    fn create_todo(&self, request: &CreateTodoRequest) -> Result<Todo> {
        let begin = Instant::now();
        let result = self.next.create_todo(request);
        log_call!(
            result,
            begin.elapsed(),
            method::CREATE_TODO,
            value = request.value.as_str(),
            complete = request.complete,
        );
        result
    }

    fn update_todo(&self, request: &UpdateTodoRequest) -> Result<Todo> {
        let begin = Instant::now();
        let result = self.next.update_todo(request);
        log_call!(
            result,
            begin.elapsed(),
            method::UPDATE_TODO,
            id = request.id,
            value = request.value.as_str(),
            complete = request.complete,
        );
        result
    }

    fn delete_todo(&self, request: &DeleteTodoRequest) -> Result<()> {
        let begin = Instant::now();
        let result = self.next.delete_todo(request);
        log_call!(result, begin.elapsed(), method::DELETE_TODO, id = request.id);
        result
    }

    fn get_todo_by_id(&self, request: &GetTodoByIdRequest) -> Result<Todo> {
        let begin = Instant::now();
        let result = self.next.get_todo_by_id(request);
        log_call!(result, begin.elapsed(), method::GET_TODO_BY_ID, id = request.id);
        result
    }

    fn get_all_todos(&self) -> Result<Vec<Todo>> {
        let begin = Instant::now();
        let result = self.next.get_all_todos();
        log_call!(result, begin.elapsed(), method::GET_ALL_TODOS);
        result
    }
}
