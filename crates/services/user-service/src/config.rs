//! User service configuration.

use common::{ConfigError, DatabaseConfig};

/// User service configuration.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    pub database: DatabaseConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `USER_SERVICE_DATABASE_URL` takes precedence over `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
        })
    }
}
