//! PostgreSQL-backed todo store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use super::{TodoItem, TodoStore};
use crate::config::Config;
use crate::error::StoreError;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS list (\
    id SERIAL PRIMARY KEY, \
    item TEXT, \
    done BOOLEAN DEFAULT false\
)";

// `item` and `done` are nullable; NULL reads as empty text and not done.
const SELECT_ALL: &str =
    "SELECT id, COALESCE(item, '') AS item, COALESCE(done, false) AS done FROM list ORDER BY id";

const INSERT: &str = "INSERT INTO list (item, done) VALUES ($1, false) \
    RETURNING id, COALESCE(item, '') AS item, COALESCE(done, false) AS done";

const UPDATE_DONE: &str = "UPDATE list SET done = $2 WHERE id = $1 \
    RETURNING id, COALESCE(item, '') AS item, COALESCE(done, false) AS done";

const DELETE: &str = "DELETE FROM list WHERE id = $1";

/// Todo store over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool using the database settings in `config`.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        info!(
            "Connecting to Postgres at {}:{}/{}",
            config.db_host, config.db_port, config.db_name
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(config.connect_options())
            .await?;

        Ok(Self::new(pool))
    }

    /// Create the `list` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("Table `list` is ready");
        Ok(())
    }

    /// Underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        let items = sqlx::query_as::<_, TodoItem>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn create(&self, item: &str) -> Result<TodoItem, StoreError> {
        let created = sqlx::query_as::<_, TodoItem>(INSERT)
            .bind(item)
            .fetch_one(&self.pool)
            .await?;
        debug!(id = created.id, "Created item");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn set_done(&self, id: i32, done: bool) -> Result<Option<TodoItem>, StoreError> {
        let updated = sqlx::query_as::<_, TodoItem>(UPDATE_DONE)
            .bind(id)
            .bind(done)
            .fetch_optional(&self.pool)
            .await?;
        debug!(found = updated.is_some(), "Updated item");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        let deleted = result.rows_affected() > 0;
        debug!(deleted, "Deleted item");
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
