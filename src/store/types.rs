//! Persisted record types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single row of the `list` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TodoItem {
    /// Database-assigned identifier.
    pub id: i32,
    /// Item text.
    pub item: String,
    /// Whether the item is completed.
    pub done: bool,
}

impl TodoItem {
    /// Create a record that has not been marked done.
    pub fn new(id: i32, item: impl Into<String>) -> Self {
        Self {
            id,
            item: item.into(),
            done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let item = TodoItem::new(7, "milk");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "item": "milk", "done": false}));
    }
}
