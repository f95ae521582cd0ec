//! Storage layer for todo items.
//!
//! This module handles:
//! - The persisted [`TodoItem`] record
//! - The [`TodoStore`] data-access interface
//! - A PostgreSQL implementation over an `sqlx` pool
//! - An in-memory implementation for tests and local runs

pub mod memory;
pub mod postgres;
pub mod types;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::StoreError;

pub use memory::MemoryTodoStore;
pub use postgres::PgTodoStore;
pub use types::TodoItem;

/// Data-access operations over the `list` table.
///
/// Handlers receive an implementation through [`crate::api::AppState`],
/// so storage is always passed in explicitly rather than reached globally.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All items, ordered by id.
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError>;

    /// Insert a new item with `done = false`. The store assigns the id.
    async fn create(&self, item: &str) -> Result<TodoItem, StoreError>;

    /// Set the `done` flag of an item. Returns `None` if no item has `id`.
    async fn set_done(&self, id: i32, done: bool) -> Result<Option<TodoItem>, StoreError>;

    /// Remove an item. Returns `false` if no item has `id`.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Connect to Postgres and, if configured, create the `list` table.
pub async fn open_postgres(config: &Config) -> crate::Result<PgTodoStore> {
    let store = PgTodoStore::connect(config).await?;
    if config.db_init_schema {
        store.ensure_schema().await?;
    }
    Ok(store)
}
