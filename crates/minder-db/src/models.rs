use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
///
/// `password_hash` holds the salted PBKDF2 encoding produced by the auth
/// layer, never a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted to-do task row.
///
/// Rows are kept in insertion order via the AUTOINCREMENT id; `plan` holds
/// the generated plan text once one has been attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub task_name: String,
    pub completed: bool,
    pub plan: Option<String>,
    pub created_at: DateTime<Utc>,
}
