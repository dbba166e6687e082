//! HTTP/JSON front end for the todo service.
//!
//! # Overview
//! Maps wire requests onto `todo_core::TodoService` calls and maps the typed
//! results back to JSON bodies and status codes. The service behind the router
//! is the decorated chain `Instrumenting(Logging(InMemoryStore))`.
//!
//! # Design
//! - `transport` owns every wire concern: path and body decoding, the
//!   error-kind to status table, and the `{"error": ...}` body.
//! - `routes` holds thin handlers plus the health and metrics endpoints.
//! - `server` runs the listener and drains in-flight requests on shutdown
//!   within a bounded window.

pub mod config;
pub mod routes;
pub mod server;
pub mod transport;

pub use config::ServerConfig;
pub use routes::{app, build_router, AppState};
pub use server::{serve, shutdown_signal};
pub use transport::{status_for, ApiError, ErrorBody, JsonBody, TodoId};
