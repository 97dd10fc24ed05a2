//! Registration pipeline against a real store, hasher and issuer.

use std::sync::Arc;

use tokio_test::assert_ok;

use auth_service_lib::{AuthServiceConfig, Registrar, RegistrationService, TokenIssuer, JwtIssuer};
use common::{AppError, DatabaseConfig};
use domain::{
    CredentialHasher, HashingParams, Password, RegistrationRequest, TokenKind,
};
use user_service_lib::infra::Database;
use user_service_lib::repository::{UserRepository, UserStore};

const SECRET: &str = "integration-test-secret-at-least-32-chars";

fn config() -> AuthServiceConfig {
    let mut config = AuthServiceConfig::new(SECRET);
    config.hashing = HashingParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };
    config
}

async fn setup() -> (Registrar, Arc<UserStore>) {
    let db = Database::connect(&DatabaseConfig::in_memory("sqlite::memory:"))
        .await
        .expect("in-memory database should start");
    let store = Arc::new(UserStore::new(db.get_connection()));
    let registrar = Registrar::from_config(&config(), store.clone()).unwrap();
    (registrar, store)
}

fn alice() -> RegistrationRequest {
    RegistrationRequest::new("alice", "Str0ng!Pass", "Str0ng!Pass", "alice@example.com", true)
}

#[tokio::test]
async fn test_alice_registers_with_verifiable_hash_and_tokens() {
    let (registrar, store) = setup().await;

    let pair = registrar.register(alice()).await.unwrap();

    let user = store.find_by_username("alice").await.unwrap().unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert_ne!(user.password_hash, "Str0ng!Pass");

    let hasher = CredentialHasher::argon2(config().hashing).unwrap();
    let stored = Password::from_hash(user.password_hash.clone());
    assert!(hasher.verify("Str0ng!Pass", &stored));
    assert!(!hasher.verify("Str0ng!Pas", &stored));

    let history = store.password_history(user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].password_hash, user.password_hash);

    let issuer = JwtIssuer::from_config(&config()).unwrap();
    assert_eq!(issuer.verify(&pair.access_token, TokenKind::Access).unwrap().sub, user.id);
    assert_eq!(issuer.verify(&pair.refresh_token, TokenKind::Refresh).unwrap().sub, user.id);
}

#[tokio::test]
async fn test_second_identical_registration_is_duplicate() {
    let (registrar, store) = setup().await;
    assert_ok!(registrar.register(alice()).await);

    let result = registrar.register(alice()).await;

    assert!(matches!(result, Err(AppError::DuplicateIdentity)));
    let user = store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(store.password_history(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_weak_password_leaves_store_empty() {
    let (registrar, store) = setup().await;
    let request = RegistrationRequest::new("alice", "short", "short", "alice@example.com", true);

    let result = registrar.register(request).await;

    assert!(matches!(result, Err(AppError::WeakPassword(_))));
    assert!(store.find_by_username("alice").await.unwrap().is_none());
}
