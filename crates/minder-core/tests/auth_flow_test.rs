//! Integration tests for registration and login against the SQLite-backed
//! credential store.

use minder_core::auth::{AuthError, Authenticator, CredentialStore, SqliteCredentialStore};
use minder_test_utils::memory_pool;

#[tokio::test]
async fn register_then_login_happy_path() {
    let db = memory_pool().await;
    let mut auth = Authenticator::new(SqliteCredentialStore::new(db.clone()));

    auth.register("ada", "s3cret").await.unwrap();
    let session = auth.login("ada", "s3cret").await.unwrap();

    assert_eq!(session.username, "ada");
    assert!(session.user_id >= 1);

    db.close().await;
}

#[tokio::test]
async fn duplicate_registration_rejected_on_second_attempt() {
    let db = memory_pool().await;
    let mut auth = Authenticator::new(SqliteCredentialStore::new(db.clone()));

    auth.register("ada", "one").await.unwrap();
    let result = auth.register("ada", "two").await;
    assert!(matches!(result, Err(AuthError::DuplicateUser(name)) if name == "ada"));

    db.close().await;
}

#[tokio::test]
async fn unregistered_username_always_invalid_credentials() {
    let db = memory_pool().await;
    let mut auth = Authenticator::new(SqliteCredentialStore::new(db.clone()));

    let result = auth.login("nobody", "anything").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));

    db.close().await;
}

#[tokio::test]
async fn stored_record_is_a_hash_that_verifies() {
    let db = memory_pool().await;
    let store = SqliteCredentialStore::new(db.clone());
    let mut auth = Authenticator::new(store.clone());

    auth.register("ada", "correct horse").await.unwrap();

    let stored = store.find_by_username("ada").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "correct horse");
    assert!(minder_core::auth::password::verify_password(
        "correct horse",
        &stored.password_hash
    ));

    db.close().await;
}

#[tokio::test]
async fn sessions_survive_across_authenticators() {
    // Two authenticator instances over the same store, as in two process
    // runs: registration in the first is visible to the second.
    let db = memory_pool().await;

    let mut first = Authenticator::new(SqliteCredentialStore::new(db.clone()));
    first.register("ada", "s3cret").await.unwrap();
    drop(first);

    let mut second = Authenticator::new(SqliteCredentialStore::new(db.clone()));
    let session = second.login("ada", "s3cret").await.unwrap();
    assert_eq!(session.username, "ada");

    db.close().await;
}
