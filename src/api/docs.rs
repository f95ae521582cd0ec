//! OpenAPI document for the HTTP API.

use utoipa::OpenApi;

use super::handlers::{
    self, HealthResponse, ItemResponse, ItemsResponse, MessageResponse, ReadyResponse,
};
use crate::store::TodoItem;

/// OpenAPI description served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "todo-api", description = "Todo list CRUD API"),
    paths(
        handlers::index,
        handlers::health,
        handlers::ready,
        handlers::list_items,
        handlers::create_item,
        handlers::update_item,
        handlers::delete_item,
        handlers::metrics,
    ),
    components(schemas(
        TodoItem,
        ItemResponse,
        ItemsResponse,
        MessageResponse,
        HealthResponse,
        ReadyResponse,
    ))
)]
pub struct ApiDoc;
