use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use todo_core::{
    CreateTodoRequest, DeleteTodoRequest, GetTodoByIdRequest, InMemoryStore, InstrumentingMiddleware,
    LoggingMiddleware, MetricsRegistry, Todo, TodoService, UpdateTodoRequest,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::transport::{ApiError, JsonBody, TodoId};

/// Shared handler state: the decorated service and the registry its
/// instrumentation writes to.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn TodoService>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    /// Wire `Instrumenting(Logging(InMemoryStore))` against `metrics`.
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        let store = LoggingMiddleware::new(InMemoryStore::new());
        let service = InstrumentingMiddleware::new(store, metrics.clone());
        Self::with_service(Arc::new(service), metrics)
    }

    pub fn with_service(service: Arc<dyn TodoService>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { service, metrics }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(MetricsRegistry::new()))
    }
}

/// Router over a fresh store with default configuration.
pub fn app() -> Router {
    build_router(AppState::default(), &ServerConfig::default())
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/todos", get(get_all_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo_by_id).put(update_todo).delete(delete_todo),
        )
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(_) if origin == "*" => {
                tracing::warn!("ignoring wildcard CORS origin; credentials are allowed");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn create_todo(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.service.create_todo(&request)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    JsonBody(mut request): JsonBody<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    request.id = id;
    Ok(Json(state.service.update_todo(&request)?))
}

async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<StatusCode, ApiError> {
    state.service.delete_todo(&DeleteTodoRequest { id })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_todo_by_id(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.service.get_todo_by_id(&GetTodoByIdRequest { id })?))
}

async fn get_all_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.get_all_todos()?))
}

async fn health() -> &'static str {
    "Healthy"
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
