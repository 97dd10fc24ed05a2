//! Repository tests against SQLite stores.

use std::sync::Arc;

use common::{AppError, DatabaseConfig};
use sea_orm::ConnectionTrait;
use tokio_test::assert_ok;
use user_service_lib::infra::Database;
use user_service_lib::repository::{UserRepository, UserStore};

const HASH: &str = "$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNo";

async fn setup() -> (Database, UserStore) {
    let db = Database::connect(&DatabaseConfig::in_memory("sqlite::memory:"))
        .await
        .expect("in-memory database should start");
    let store = UserStore::new(db.get_connection());
    (db, store)
}

async fn register(store: &UserStore, username: &str, email: &str) -> Result<uuid::Uuid, AppError> {
    store
        .register(username.to_string(), HASH.to_string(), email.to_string())
        .await
}

#[tokio::test]
async fn test_register_writes_user_and_history() {
    let (_db, store) = setup().await;

    let id = register(&store, "alice", "alice@example.com").await.unwrap();

    let user = store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.password_hash, HASH);

    let history = store.password_history(id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, id);
    assert_eq!(history[0].password_hash, user.password_hash);
}

#[tokio::test]
async fn test_email_is_stored_as_submitted() {
    let (_db, store) = setup().await;

    register(&store, "mixed", "Mixed.Case@Example.COM").await.unwrap();

    assert!(store
        .find_by_email("Mixed.Case@Example.COM")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (_db, store) = setup().await;
    register(&store, "alice", "alice@example.com").await.unwrap();

    let result = register(&store, "alice", "other@example.com").await;

    assert!(matches!(result, Err(AppError::DuplicateIdentity)));
    assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let (_db, store) = setup().await;
    let first = register(&store, "alice", "alice@example.com").await.unwrap();

    let result = register(&store, "alicia", "alice@example.com").await;

    assert!(matches!(result, Err(AppError::DuplicateIdentity)));
    assert!(store.find_by_username("alicia").await.unwrap().is_none());
    assert_eq!(store.password_history(first).await.unwrap().len(), 1);
}

/// File-backed store whose pool hands out several connections at once.
async fn pooled_file_store(path: &std::path::Path) -> (Database, UserStore) {
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 4,
        min_connections: 2,
        acquire_timeout_secs: 5,
    };
    let db = Database::connect(&config)
        .await
        .expect("file-backed database should start");
    let store = UserStore::new(db.get_connection());
    (db, store)
}

fn remove_database_files(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_registrations_for_same_username() {
    let path = std::env::temp_dir().join(format!("registration-{}.db", uuid::Uuid::new_v4()));
    let (db, store) = pooled_file_store(&path).await;
    let store = Arc::new(store);

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { register(&store, "bob", "bob1@example.com").await }
    });
    let second = tokio::spawn({
        let store = Arc::clone(&store);
        async move { register(&store, "bob", "bob2@example.com").await }
    });
    let outcomes = [first.await.unwrap(), second.await.unwrap()];

    let winner = store.find_by_username("bob").await.unwrap().unwrap();
    let bob1 = store.find_by_email("bob1@example.com").await.unwrap();
    let bob2 = store.find_by_email("bob2@example.com").await.unwrap();
    drop(store);
    drop(db);
    remove_database_files(&path);

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(AppError::DuplicateIdentity))));
    assert_eq!(bob1.is_some() as usize + bob2.is_some() as usize, 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Ok(id) if *id == winner.id)));
}

#[tokio::test]
async fn test_failed_history_insert_leaves_no_user() {
    let (db, store) = setup().await;
    db.connection()
        .execute_unprepared("DROP TABLE password_history")
        .await
        .unwrap();

    let result = register(&store, "carol", "carol@example.com").await;

    assert!(matches!(result, Err(AppError::StoreOperationFailed(_))));
    assert!(store.find_by_username("carol").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unregister_removes_user_and_history() {
    let (_db, store) = setup().await;
    let id = register(&store, "dave", "dave@example.com").await.unwrap();

    assert_ok!(store.unregister(id).await);

    assert!(store.find_by_username("dave").await.unwrap().is_none());
    assert!(store.password_history(id).await.unwrap().is_empty());

    // Username becomes available again
    register(&store, "dave", "dave@example.com").await.unwrap();
}

#[tokio::test]
async fn test_unregister_unknown_user_is_noop() {
    let (_db, store) = setup().await;
    assert_ok!(store.unregister(uuid::Uuid::new_v4()).await);
}

#[tokio::test]
async fn test_ping_and_migration_status() {
    let (db, _store) = setup().await;

    db.ping().await.unwrap();

    let status = db.migration_status().await.unwrap();
    assert_eq!(status.len(), 2);
    assert!(status.iter().all(|(_, applied)| *applied));
}
