//! Todo list HTTP API backed by PostgreSQL.
//!
//! A single table holds the items:
//!
//! ```text
//! list(id SERIAL PRIMARY KEY, item TEXT, done BOOLEAN)
//! ```
//!
//! Every route is a `GET`, kept that way for the existing frontend:
//!
//! ```text
//! GET /                        -> {"message":"TODO APP"}
//! GET /items                   -> {"items":[...]}
//! GET /item/create/:item       -> 201 {"item":{...}}
//! GET /item/update/:id/:done   -> 200 {"item":{...}} | 404 {"message":"not found"}
//! GET /item/delete/:id         -> 200 {"message":"deleted"} | 404 {"message":"not found"}
//! GET /metrics                 -> Prometheus text exposition
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Storage layer (Postgres and in-memory)
//! - [`api`]: HTTP handlers and router
//! - [`metrics`]: Prometheus recorder and request middleware
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{Result, TodoError};
