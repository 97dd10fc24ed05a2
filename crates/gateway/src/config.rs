//! Gateway configuration.

use common::{env_parse, ConfigError};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Domain attribute for session cookies; host-only when unset
    pub cookie_domain: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: std::env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            port: env_parse("GATEWAY_PORT", defaults.port)?,
            cookie_domain: std::env::var("COOKIE_DOMAIN")
                .ok()
                .filter(|domain| !domain.trim().is_empty()),
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cookie_domain: None,
        }
    }
}
