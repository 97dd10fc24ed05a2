//! Auth service configuration.

use std::str::FromStr;

use common::{env_parse, ConfigError};
use domain::{
    CredentialHasher, HashingParams, PasswordPolicy, DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
    DEFAULT_REFRESH_TOKEN_TTL_DAYS, DEFAULT_STORE_TIMEOUT_SECS, MAX_ACCESS_TOKEN_TTL_MINUTES,
    MAX_REFRESH_TOKEN_TTL_DAYS, MIN_JWT_SECRET_LENGTH, SECONDS_PER_DAY, SECONDS_PER_MINUTE,
};

/// Secret used by debug builds when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "development-only-secret-change-me-before-deploying";

/// What happens to a committed user when token issuance fails afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenFailurePolicy {
    /// The user stays registered; the request still fails.
    #[default]
    KeepUser,
    /// The user and its password history are removed before failing.
    RollBack,
}

impl FromStr for TokenFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep_user" => Ok(TokenFailurePolicy::KeepUser),
            "roll_back" => Ok(TokenFailurePolicy::RollBack),
            other => Err(format!("expected keep_user or roll_back, got '{}'", other)),
        }
    }
}

/// Auth service configuration.
#[derive(Clone)]
pub struct AuthServiceConfig {
    /// JWT secret for signing tokens (min 32 characters)
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub hashing: HashingParams,
    pub password_policy: PasswordPolicy,
    pub token_failure: TokenFailurePolicy,
    /// Deadline for each store operation of a registration
    pub store_timeout_secs: u64,
}

impl std::fmt::Debug for AuthServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("hashing", &self.hashing)
            .field("password_policy", &self.password_policy)
            .field("token_failure", &self.token_failure)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .finish()
    }
}

impl AuthServiceConfig {
    /// Configuration with default lifetimes and policies.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl_minutes: DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
            refresh_token_ttl_days: DEFAULT_REFRESH_TOKEN_TTL_DAYS,
            hashing: HashingParams::default(),
            password_policy: PasswordPolicy::default(),
            token_failure: TokenFailurePolicy::default(),
            store_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => return Err(ConfigError::Missing("JWT_SECRET".to_string())),
        };

        let defaults = Self::new(jwt_secret);
        let config = Self {
            access_token_ttl_minutes: env_parse(
                "ACCESS_TOKEN_TTL_MINUTES",
                defaults.access_token_ttl_minutes,
            )?,
            refresh_token_ttl_days: env_parse(
                "REFRESH_TOKEN_TTL_DAYS",
                defaults.refresh_token_ttl_days,
            )?,
            hashing: HashingParams {
                memory_kib: env_parse("PASSWORD_HASH_MEMORY_KIB", defaults.hashing.memory_kib)?,
                iterations: env_parse("PASSWORD_HASH_ITERATIONS", defaults.hashing.iterations)?,
                parallelism: env_parse(
                    "PASSWORD_HASH_PARALLELISM",
                    defaults.hashing.parallelism,
                )?,
            },
            password_policy: PasswordPolicy {
                min_length: env_parse("PASSWORD_MIN_LENGTH", defaults.password_policy.min_length)?,
                min_character_classes: env_parse(
                    "PASSWORD_MIN_CHARACTER_CLASSES",
                    defaults.password_policy.min_character_classes,
                )?,
                reject_common: env_parse(
                    "PASSWORD_REJECT_COMMON",
                    defaults.password_policy.reject_common,
                )?,
            },
            token_failure: env_parse("TOKEN_FAILURE_POLICY", defaults.token_failure)?,
            store_timeout_secs: env_parse("STORE_TIMEOUT_SECS", defaults.store_timeout_secs)?,
            jwt_secret: defaults.jwt_secret,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the issuer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {} characters", MIN_JWT_SECRET_LENGTH),
            ));
        }
        if !(1..=MAX_ACCESS_TOKEN_TTL_MINUTES).contains(&self.access_token_ttl_minutes) {
            return Err(ConfigError::invalid(
                "ACCESS_TOKEN_TTL_MINUTES",
                format!("must be between 1 and {}", MAX_ACCESS_TOKEN_TTL_MINUTES),
            ));
        }
        if !(1..=MAX_REFRESH_TOKEN_TTL_DAYS).contains(&self.refresh_token_ttl_days) {
            return Err(ConfigError::invalid(
                "REFRESH_TOKEN_TTL_DAYS",
                format!("must be between 1 and {}", MAX_REFRESH_TOKEN_TTL_DAYS),
            ));
        }
        if self.store_timeout_secs == 0 {
            return Err(ConfigError::invalid("STORE_TIMEOUT_SECS", "must be positive"));
        }
        Ok(())
    }

    /// Access token lifetime in seconds.
    pub fn access_ttl_secs(&self) -> Result<i64, ConfigError> {
        self.access_token_ttl_minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .ok_or_else(|| ConfigError::invalid("ACCESS_TOKEN_TTL_MINUTES", "out of range"))
    }

    /// Refresh token lifetime in seconds.
    pub fn refresh_ttl_secs(&self) -> Result<i64, ConfigError> {
        self.refresh_token_ttl_days
            .checked_mul(SECONDS_PER_DAY)
            .ok_or_else(|| ConfigError::invalid("REFRESH_TOKEN_TTL_DAYS", "out of range"))
    }

    /// Argon2id hasher for the configured work factor.
    pub fn hasher(&self) -> Result<CredentialHasher, ConfigError> {
        CredentialHasher::argon2(self.hashing)
            .map_err(|e| ConfigError::invalid("PASSWORD_HASH_MEMORY_KIB", e.to_string()))
    }

    /// Get JWT secret as bytes.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}
