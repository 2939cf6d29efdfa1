//! Integration tests for user rows.

use minder_db::queries::users;
use minder_test_utils::{memory_pool, seed_user};

#[tokio::test]
async fn insert_and_find_roundtrip() {
    let db = memory_pool().await;

    let inserted = seed_user(&db, "ada", "pbkdf2-sha256$1$00$ff").await;

    let found = users::find_user_by_username(&db, "ada")
        .await
        .unwrap()
        .expect("ada should exist");
    assert_eq!(found.id, inserted.id);
    assert_eq!(found.username, "ada");
    assert_eq!(found.password_hash, "pbkdf2-sha256$1$00$ff");

    db.close().await;
}

#[tokio::test]
async fn find_unknown_user_returns_none() {
    let db = memory_pool().await;

    let found = users::find_user_by_username(&db, "nobody").await.unwrap();
    assert!(found.is_none());

    db.close().await;
}

#[tokio::test]
async fn lookup_is_exact_not_prefix() {
    let db = memory_pool().await;

    seed_user(&db, "ada", "h").await;

    assert!(
        users::find_user_by_username(&db, "ad")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        users::find_user_by_username(&db, "ada ")
            .await
            .unwrap()
            .is_none()
    );

    db.close().await;
}

#[tokio::test]
async fn count_tracks_registrations() {
    let db = memory_pool().await;

    assert_eq!(users::count_users(&db).await.unwrap(), 0);
    seed_user(&db, "ada", "h").await;
    seed_user(&db, "grace", "h").await;
    assert_eq!(users::count_users(&db).await.unwrap(), 2);

    db.close().await;
}
