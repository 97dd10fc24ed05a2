//! Registration pipeline: validate, hash, persist, issue tokens.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::token_issuer::{JwtIssuer, TokenIssuer};
use crate::config::{AuthServiceConfig, TokenFailurePolicy};
use common::{AppError, AppResult, ConfigError};
use domain::{
    CredentialHasher, RegistrationRequest, RegistrationStage, RegistrationValidator, TokenPair,
    UsernamePolicy, DEFAULT_STORE_TIMEOUT_SECS,
};
use user_service_lib::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new account and issue its session tokens.
    ///
    /// Consumes the request; its plaintext secrets are wiped once hashing
    /// is done.
    async fn register(&self, request: RegistrationRequest) -> AppResult<TokenPair>;
}

/// Concrete registration pipeline.
pub struct Registrar {
    validator: RegistrationValidator,
    hasher: CredentialHasher,
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenIssuer>,
    token_failure: TokenFailurePolicy,
    store_timeout: Duration,
}

impl Registrar {
    pub fn new(
        validator: RegistrationValidator,
        hasher: CredentialHasher,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenIssuer>,
        token_failure: TokenFailurePolicy,
    ) -> Self {
        Self {
            validator,
            hasher,
            users,
            tokens,
            token_failure,
            store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }

    /// Deadline for each store call; exceeding it reports the store unavailable.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Wire the Argon2id hasher and JWT issuer described by `config`.
    ///
    /// # Errors
    /// Returns `ConfigError` for lifetimes or work factors the pipeline
    /// could not use at request time.
    pub fn from_config(
        config: &AuthServiceConfig,
        users: Arc<dyn UserRepository>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            RegistrationValidator::new(UsernamePolicy::default(), config.password_policy.clone()),
            config.hasher()?,
            users,
            Arc::new(JwtIssuer::from_config(config)?),
            config.token_failure,
        )
        .with_store_timeout(Duration::from_secs(config.store_timeout_secs)))
    }

    /// Run a store call under the store deadline.
    ///
    /// A call still pending at the deadline is dropped; an open transaction
    /// is rolled back when its handle drops.
    async fn within_deadline<T>(&self, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                AppError::store_unavailable(format!(
                    "no response within {}ms",
                    self.store_timeout.as_millis()
                ))
            })?
    }

    /// Hash on the blocking thread pool.
    async fn hash_password(&self, plaintext: Zeroizing<String>) -> AppResult<String> {
        let hasher = self.hasher.clone();
        let outcome = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AppError::hashing_failed(format!("hashing task aborted: {}", e)))?;

        Ok(outcome?.into_string())
    }

    async fn on_token_failure(&self, user_id: Uuid, error: AppError) -> AppError {
        match self.token_failure {
            TokenFailurePolicy::KeepUser => {
                tracing::error!(%user_id, "Token issuance failed, registered user kept");
            }
            TokenFailurePolicy::RollBack => {
                tracing::error!(%user_id, "Token issuance failed, removing registered user");
                if let Err(undo) = self.within_deadline(self.users.unregister(user_id)).await {
                    tracing::error!(%user_id, "Failed to remove user after token failure: {}", undo);
                }
            }
        }
        error
    }
}

#[async_trait]
impl RegistrationService for Registrar {
    async fn register(&self, request: RegistrationRequest) -> AppResult<TokenPair> {
        let username = request.username.clone();
        tracing::debug!(%username, stage = %RegistrationStage::Received, "Registration started");

        if let Err(e) = self.validator.validate(&request) {
            tracing::warn!(%username, reason = %e, "Registration rejected");
            return Err(e.into());
        }
        tracing::debug!(%username, stage = %RegistrationStage::Validated, "Registration stage reached");

        let email = request.email.clone();
        let secret = Zeroizing::new(request.password.clone());
        drop(request);

        let password_hash = self.hash_password(secret).await.map_err(|e| {
            if e.is_client_error() {
                tracing::warn!(%username, reason = %e, "Registration rejected");
            }
            e
        })?;
        tracing::debug!(%username, stage = %RegistrationStage::Hashed, "Registration stage reached");

        let user_id = self
            .within_deadline(self.users.register(username.clone(), password_hash, email))
            .await
            .map_err(|e| {
                if e.is_client_error() {
                    tracing::warn!(%username, reason = %e, "Registration rejected");
                }
                e
            })?;
        tracing::debug!(%username, %user_id, stage = %RegistrationStage::Persisted, "Registration stage reached");

        let tokens = match self.tokens.issue(user_id) {
            Ok(tokens) => tokens,
            Err(e) => return Err(self.on_token_failure(user_id, e).await),
        };
        tracing::debug!(%username, %user_id, stage = %RegistrationStage::TokenIssued, "Registration stage reached");

        tracing::info!(%username, %user_id, "User registered");
        Ok(tokens)
    }
}
