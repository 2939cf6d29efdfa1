//! Shared test utilities for minder integration tests.
//!
//! Provides in-memory SQLite pools with migrations applied, plus seed
//! helpers. Every call to [`memory_pool`] returns a fresh, fully isolated
//! database, so tests never share state and need no cleanup.

use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use minder_db::models::{TaskRow, User};
use minder_db::pool;
use minder_db::queries::{tasks, users};

/// Create an in-memory database with migrations applied.
///
/// The pool is pinned to a single connection that never expires: an
/// in-memory SQLite database lives and dies with its connection, so the
/// pool must not recycle it.
pub async fn memory_pool() -> SqlitePool {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(10))
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    pool::run_migrations(&db)
        .await
        .expect("migrations should succeed");

    db
}

/// Insert a user row for tests. The hash is stored verbatim.
pub async fn seed_user(pool: &SqlitePool, username: &str, password_hash: &str) -> User {
    users::insert_user(pool, username, password_hash)
        .await
        .expect("failed to seed user")
}

/// Insert a task row for tests.
pub async fn seed_task(pool: &SqlitePool, name: &str) -> TaskRow {
    tasks::insert_task(pool, name)
        .await
        .expect("failed to seed task")
}
