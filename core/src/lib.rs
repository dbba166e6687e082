//! Runtime-free core of the todo service.
//!
//! # Overview
//! Defines the `TodoService` contract, its in-memory implementation, and the
//! logging and instrumenting decorators that wrap it. Nothing here knows about
//! HTTP or async runtimes; the server crate adapts these calls to the wire.
//!
//! # Design
//! - Errors carry an `ErrorKind`; the transport maps kinds to status codes.
//! - Decorators own their inner service and implement the same trait, so a
//!   chain is built by nesting constructors:
//!   `InstrumentingMiddleware::new(LoggingMiddleware::new(InMemoryStore::new()), sink)`.
//! - The store serializes every operation behind one mutex and returns copies.

pub mod error;
pub mod inmem;
pub mod metrics;
pub mod middleware;
pub mod service;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use inmem::InMemoryStore;
pub use metrics::{MetricsRegistry, MetricsSink};
pub use middleware::{InstrumentingMiddleware, LoggingMiddleware};
pub use service::TodoService;
pub use types::{CreateTodoRequest, DeleteTodoRequest, GetTodoByIdRequest, Todo, UpdateTodoRequest};
