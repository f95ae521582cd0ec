//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::store::{TodoItem, TodoStore};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend.
    pub store: Arc<dyn TodoStore>,
    /// Handle used to render the metrics exposition.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create new app state.
    pub fn new(store: Arc<dyn TodoStore>, metrics: PrometheusHandle) -> Self {
        Self { store, metrics }
    }
}

/// Body carrying a single human-readable message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Message text, e.g. `not found`.
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Item listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemsResponse {
    /// All items; empty when the table is empty.
    pub items: Vec<TodoItem>,
}

/// A single item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    /// The created or updated item.
    pub item: TodoItem,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the store answered.
    pub ready: bool,
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

/// Parse a boolean path segment, accepting the usual spellings
/// (`1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts).
pub fn parse_done(raw: &str) -> Result<bool, ApiError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ApiError::InvalidDone),
    }
}

/// Index handler.
#[utoipa::path(get, path = "/", responses((status = 200, body = MessageResponse)))]
pub async fn index() -> impl IntoResponse {
    Json(MessageResponse::new("TODO APP"))
}

/// Health check handler - always returns 200.
#[utoipa::path(get, path = "/health", responses((status = 200, body = HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if the store is reachable, 503 otherwise.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, body = ReadyResponse),
        (status = 503, body = ReadyResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(ReadyResponse { ready: true })),
        Err(e) => {
            warn!(error = %e, "Store is not reachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse { ready: false }),
            )
        }
    }
}

/// List all items.
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, body = ItemsResponse),
        (status = 500, body = MessageResponse)
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state.store.list().await?;
    Ok(Json(ItemsResponse { items }))
}

/// Create an item from the path text.
#[utoipa::path(
    get,
    path = "/item/create/{item}",
    params(("item" = String, Path, description = "Item text")),
    responses(
        (status = 201, body = ItemResponse),
        (status = 500, body = MessageResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    Path(item): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.store.create(&item).await?;
    info!(id = created.id, "Item created");
    Ok((StatusCode::CREATED, Json(ItemResponse { item: created })))
}

/// Set the done flag of an item.
#[utoipa::path(
    get,
    path = "/item/update/{id}/{done}",
    params(
        ("id" = i32, Path, description = "Item id"),
        ("done" = bool, Path, description = "New done flag")
    ),
    responses(
        (status = 200, body = ItemResponse),
        (status = 400, body = MessageResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path((id, done)): Path<(String, String)>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id)?;
    let done = parse_done(&done)?;

    let updated = state
        .store
        .set_done(id, done)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(id, done, "Item updated");
    Ok(Json(ItemResponse { item: updated }))
}

/// Delete an item.
#[utoipa::path(
    get,
    path = "/item/delete/{id}",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, body = MessageResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    if !state.store.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    info!(id, "Item deleted");
    Ok(Json(MessageResponse::new("deleted")))
}

/// Prometheus text exposition.
#[utoipa::path(get, path = "/metrics", responses((status = 200, body = String)))]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
