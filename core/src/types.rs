//! Domain DTOs for the todo service.
//!
//! # Design
//! `Todo` is the only persisted shape; the `*Request` types live for the
//! duration of a single service call. Request types deserialize straight from
//! the wire bodies, while path-carried ids are filled in by the transport.

use serde::{Deserialize, Serialize};

/// A single todo item owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub value: String,
    pub complete: bool,
}

/// Payload for creating a new todo.
///
/// `complete` is accepted on the wire but new todos always start incomplete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub complete: bool,
}

/// Payload for overwriting an existing todo's `value` and `complete`.
///
/// The `id` comes from the request path; a body-supplied id is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodoRequest {
    #[serde(skip_deserializing, default)]
    pub id: i64,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteTodoRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetTodoByIdRequest {
    pub id: i64,
}
