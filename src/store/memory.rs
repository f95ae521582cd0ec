//! In-memory todo store.
//!
//! Behaves like the Postgres store (monotonic ids, ordered listing) without
//! a database, for unit tests and `serve --memory`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{TodoItem, TodoStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    items: BTreeMap<i32, TodoItem>,
}

/// Todo store held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTodoStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTodoStore {
    /// Create an empty store. The first id handed out is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the map half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        Ok(self.lock().items.values().cloned().collect())
    }

    async fn create(&self, item: &str) -> Result<TodoItem, StoreError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let created = TodoItem::new(inner.next_id, item);
        inner.items.insert(created.id, created.clone());
        Ok(created)
    }

    async fn set_done(&self, id: i32, done: bool) -> Result<Option<TodoItem>, StoreError> {
        let mut inner = self.lock();
        Ok(inner.items.get_mut(&id).map(|existing| {
            existing.done = done;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.lock().items.remove(&id).is_some())
    }
}
