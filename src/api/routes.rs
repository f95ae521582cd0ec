//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::docs::ApiDoc;
use super::handlers::{
    create_item, delete_item, health, index, list_items, metrics, ready, update_item, AppState,
};
use crate::metrics::{track_requests, METRICS_PATH};

/// CORS policy permitting every origin, method and header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Todo endpoints
        .route("/items", get(list_items))
        .route("/item/create/:item", get(create_item))
        .route("/item/update/:id/:done", get(update_item))
        .route("/item/delete/:id", get(delete_item))
        // Metrics endpoint
        .route(METRICS_PATH, get(metrics))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
