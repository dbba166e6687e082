use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::metrics::MetricsSink;
use crate::service::{method, TodoService};
use crate::types::{CreateTodoRequest, DeleteTodoRequest, GetTodoByIdRequest, Todo, UpdateTodoRequest};

pub const REQUEST_COUNT: &str = "request_count";
pub const ERROR_COUNT: &str = "error_count";
pub const REQUEST_DURATION: &str = "request_duration_seconds";

/// Records request count, error count and latency for every call.
///
/// All three series are labelled with `method` and `error` (`"true"` or
/// `"false"`).
#[derive(Clone)]
pub struct InstrumentingMiddleware<S> {
    next: S,
    sink: Arc<dyn MetricsSink>,
}

impl<S: TodoService> InstrumentingMiddleware<S> {
    pub fn new(next: S, sink: Arc<dyn MetricsSink>) -> Self {
        Self { next, sink }
    }

    fn observe<T>(&self, method: &str, begin: Instant, result: &Result<T>) {
        let failed = result.is_err();
        let labels = [("method", method), ("error", if failed { "true" } else { "false" })];
        self.sink.increment_counter(REQUEST_COUNT, &labels);
        self.sink
            .observe_histogram(REQUEST_DURATION, &labels, begin.elapsed().as_secs_f64());
        if failed {
            self.sink.increment_counter(ERROR_COUNT, &labels);
        }
    }
}

impl<S: TodoService> TodoService for InstrumentingMiddleware<S> {
    fn create_todo(&self, request: &CreateTodoRequest) -> Result<Todo> {
        let begin = Instant::now();
        let result = self.next.create_todo(request);
        self.observe(method::CREATE_TODO, begin, &result);
        result
    }

    fn update_todo(&self, request: &UpdateTodoRequest) -> Result<Todo> {
        let begin = Instant::now();
        let result = self.next.update_todo(request);
        self.observe(method::UPDATE_TODO, begin, &result);
        result
    }

    fn delete_todo(&self, request: &DeleteTodoRequest) -> Result<()> {
        let begin = Instant::now();
        let result = self.next.delete_todo(request);
        self.observe(method::DELETE_TODO, begin, &result);
        result
    }

    fn get_todo_by_id(&self, request: &GetTodoByIdRequest) -> Result<Todo> {
        let begin = Instant::now();
        let result = self.next.get_todo_by_id(request);
        self.observe(method::GET_TODO_BY_ID, begin, &result);
        result
    }

    fn get_all_todos(&self) -> Result<Vec<Todo>> {
        let begin = Instant::now();
        let result = self.next.get_all_todos();
        self.observe(method::GET_ALL_TODOS, begin, &result);
        result
    }
}
