//! Wire decoding and error encoding.
//!
//! # Design
//! Decoders are axum extractors whose rejection is `ApiError`, so a malformed
//! body or path id produces the same `{"error": ...}` shape as a store error.
//! This module is the only place a `todo_core::ErrorKind` becomes a status
//! code.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use todo_core::{Error, ErrorKind};

pub const BODY_DECODE_FAILED: &str = "Failed to decode JSON body.";

/// Status code for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON body written for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// A domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            tracing::error!(kind = %kind, error = %self.0, "request failed");
        } else {
            tracing::debug!(kind = %kind, error = %self.0, "request rejected");
        }
        let body = ErrorBody {
            error: self.0.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Numeric todo id taken from the `{id}` path segment.
///
/// Any integer is accepted, negative included; whether it names a todo is
/// the store's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for TodoId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::invalid("Invalid value for parameter 'id'."))?;
        parse_id(&raw).map(TodoId).map_err(ApiError)
    }
}

fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.parse()
        .map_err(|_| Error::invalid(format!("Failed to convert '{raw}' to type integer.")))
}

/// JSON request body.
///
/// The `Content-Type` header is not checked. Missing fields fall back to their
/// serde defaults; a body that is not JSON or has mistyped fields is an
/// `invalid` error.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(%rejection, "could not read request body");
            Error::invalid(BODY_DECODE_FAILED)
        })?;
        decode_body(&bytes).map(Self).map_err(ApiError)
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(%err, "could not decode request body");
        Error::invalid(BODY_DECODE_FAILED)
    })
}
