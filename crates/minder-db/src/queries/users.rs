//! Database query functions for the `users` table.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::User;

/// Insert a new user row. Returns the inserted user with its generated id.
///
/// The `username` column carries a UNIQUE constraint; callers that need a
/// friendly duplicate-user error should check [`find_user_by_username`]
/// first and treat a constraint violation here as a race lost.
pub async fn insert_user(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, created_at) \
         VALUES (?, ?, ?) \
         RETURNING *",
    )
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .context("failed to insert user")?;

    Ok(user)
}

/// Look up a user by username.
pub async fn find_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("failed to look up user")?;

    Ok(user)
}

/// Count all registered users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .context("failed to count users")?;

    Ok(row.0)
}
