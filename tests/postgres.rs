//! Postgres store tests.
//!
//! These tests require a reachable database configured through DB_HOST,
//! DB_PORT, DB_USER, DB_PASSWORD and DB_NAME.
//! Run with: cargo test --test postgres -- --ignored
//!
//! Note: These tests empty the `list` table, so they hold a shared lock
//! for their whole run.

use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use tokio::sync::{Mutex, MutexGuard};

use todo_api::config::Config;
use todo_api::store::{open_postgres, PgTodoStore, TodoStore};

static TABLE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Connect to the test database with an emptied table, or `None` when DB_HOST
/// is unset. The guard keeps other tests off the table until dropped.
async fn test_store() -> Option<(PgTodoStore, MutexGuard<'static, ()>)> {
    dotenvy::dotenv().ok();
    std::env::var("DB_HOST").ok()?;

    let guard = TABLE_LOCK.lock().await;

    let config = Config::load().expect("valid DB_* environment");
    let store = open_postgres(&config).await.expect("database reachable");

    sqlx::query("TRUNCATE list RESTART IDENTITY")
        .execute(store.pool())
        .await
        .expect("table can be emptied");

    Some((store, guard))
}

/// Full create/update/delete scenario against a real table.
#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_crud_scenario() {
    let (store, _guard) = match test_store().await {
        Some(s) => s,
        None => {
            println!("Skipping: DB_HOST not set");
            return;
        }
    };

    assert!(store.list().await.unwrap().is_empty());
    store.ping().await.unwrap();

    let a = store.create("A").await.unwrap();
    let b = store.create("B").await.unwrap();
    assert_ne!(a.id, b.id);
    assert!(!a.done && !b.done);
    assert_eq!(store.list().await.unwrap(), vec![a.clone(), b.clone()]);

    let updated = store.set_done(b.id, true).await.unwrap().unwrap();
    assert_eq!(updated.item, "B");
    assert!(updated.done);

    assert_eq!(store.set_done(9999, true).await.unwrap(), None);
    assert!(!store.delete(9999).await.unwrap());

    assert!(store.delete(a.id).await.unwrap());
    assert_eq!(store.list().await.unwrap(), vec![updated]);
}

/// Text is stored verbatim, including the empty string and SQL metacharacters.
#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_create_stores_text_verbatim() {
    let (store, _guard) = match test_store().await {
        Some(s) => s,
        None => {
            println!("Skipping: DB_HOST not set");
            return;
        }
    };

    for text in ["", "it's done'; DROP TABLE list; --", "ünïcödé"] {
        let created = store.create(text).await.unwrap();
        assert_eq!(created.item, text);
    }
    assert_eq!(store.list().await.unwrap().len(), 3);
}

/// Rows with NULL columns read as empty text and not done.
#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_null_columns_read_as_defaults() {
    let (store, _guard) = match test_store().await {
        Some(s) => s,
        None => {
            println!("Skipping: DB_HOST not set");
            return;
        }
    };

    sqlx::query("INSERT INTO list (item, done) VALUES (NULL, NULL)")
        .execute(store.pool())
        .await
        .unwrap();

    let items = store.list().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item, "");
    assert!(!items[0].done);

    let updated = store.set_done(items[0].id, true).await.unwrap().unwrap();
    assert_eq!(updated.item, "");
    assert!(updated.done);
}
