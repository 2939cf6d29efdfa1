//! Credential store abstraction.
//!
//! The authenticator talks to a [`CredentialStore`] rather than a concrete
//! database, so registration and login can be tested against an in-memory
//! map. [`SqliteCredentialStore`] is the production implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

use minder_db::queries::users;

/// A credential record as the authenticator sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Lookup and insertion of credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredUser>>;
    async fn insert(&self, username: &str, password_hash: &str) -> Result<StoredUser>;
}

/// Credential store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredUser>> {
        let user = users::find_user_by_username(&self.pool, username).await?;
        Ok(user.map(|u| StoredUser {
            id: u.id,
            username: u.username,
            password_hash: u.password_hash,
        }))
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<StoredUser> {
        let user = users::insert_user(&self.pool, username, password_hash).await?;
        Ok(StoredUser {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
        })
    }
}

/// In-memory credential store for tests and examples.
///
/// Clones share the same underlying map, mirroring how pool handles share
/// one database.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    by_username: HashMap<String, StoredUser>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredUser>> {
        let inner = self.inner.lock().expect("credential store lock poisoned");
        Ok(inner.by_username.get(username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<StoredUser> {
        let mut inner = self.inner.lock().expect("credential store lock poisoned");
        if inner.by_username.contains_key(username) {
            anyhow::bail!("username {username:?} already exists");
        }
        inner.next_id += 1;
        let user = StoredUser {
            id: inner.next_id,
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
        };
        inner.by_username.insert(username.to_owned(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_assigns_sequential_ids() {
        let store = MemoryCredentialStore::default();
        let a = store.insert("ada", "h1").await.unwrap();
        let b = store.insert("grace", "h2").await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn memory_store_rejects_duplicates() {
        let store = MemoryCredentialStore::default();
        store.insert("ada", "h1").await.unwrap();
        assert!(store.insert("ada", "h2").await.is_err());
    }

    #[tokio::test]
    async fn memory_store_clones_share_state() {
        let store = MemoryCredentialStore::default();
        let clone = store.clone();
        store.insert("ada", "h1").await.unwrap();

        let found = clone.find_by_username("ada").await.unwrap();
        assert!(found.is_some());
    }
}
