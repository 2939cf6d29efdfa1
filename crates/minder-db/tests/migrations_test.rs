//! Integration tests for the embedded migrations.
//!
//! Each test opens a fresh in-memory database, so tests are fully isolated
//! and idempotent.

use minder_db::pool;
use minder_test_utils::memory_pool;

#[tokio::test]
async fn migrations_create_expected_tables() {
    let db = memory_pool().await;

    let counts = pool::table_counts(&db).await.unwrap();
    let names: Vec<&str> = counts.iter().map(|(name, _)| name.as_str()).collect();

    assert!(names.contains(&"users"), "users table missing: {names:?}");
    assert!(names.contains(&"tasks"), "tasks table missing: {names:?}");

    // Fresh database: every table starts empty.
    for (name, count) in &counts {
        assert_eq!(*count, 0, "table {name} should start empty");
    }

    db.close().await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = memory_pool().await;

    // Running the migrator a second time must be a no-op, not an error.
    pool::run_migrations(&db)
        .await
        .expect("second migration run should succeed");

    db.close().await;
}

#[tokio::test]
async fn username_uniqueness_enforced_by_schema() {
    let db = memory_pool().await;

    minder_db::queries::users::insert_user(&db, "frida", "hash-a")
        .await
        .unwrap();

    let dup = minder_db::queries::users::insert_user(&db, "frida", "hash-b").await;
    assert!(dup.is_err(), "duplicate username must violate UNIQUE");

    db.close().await;
}
