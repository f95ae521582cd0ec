//! HTTP API module for the todo endpoints, health and metrics.

pub mod docs;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
