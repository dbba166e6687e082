//! Decorators that wrap a [`TodoService`](crate::TodoService) behind the same
//! contract. Each one observes the delegated call after it returns and passes
//! the result through untouched.

pub mod instrumenting;
pub mod logging;

pub use instrumenting::InstrumentingMiddleware;
pub use logging::LoggingMiddleware;
