//! Access and refresh token issuance.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthServiceConfig;
use common::{AppError, AppResult, ConfigError};
use domain::{TokenKind, TokenPair};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub typ: TokenKind,
    /// Random per-token id
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Token issuer trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issue an access and a refresh token bound to `user_id`
    fn issue(&self, user_id: Uuid) -> AppResult<TokenPair>;

    /// Verify a token's signature, expiry and kind
    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims>;
}

/// HS256 JWT issuer.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtIssuer {
    pub fn new(secret: &[u8], access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Build the issuer from a validated configuration.
    pub fn from_config(config: &AuthServiceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config.jwt_secret_bytes(),
            config.access_ttl_secs()?,
            config.refresh_ttl_secs()?,
        ))
    }

    fn sign(&self, user_id: Uuid, kind: TokenKind, ttl_secs: i64) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::token_failed(format!("{} token lifetime out of range", kind)))?;

        let claims = Claims {
            sub: user_id,
            typ: kind,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user_id: Uuid) -> AppResult<TokenPair> {
        let access_token = self.sign(user_id, TokenKind::Access, self.access_ttl_secs)?;
        let refresh_token = self.sign(user_id, TokenKind::Refresh, self.refresh_ttl_secs)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_in: self.access_ttl_secs,
            refresh_expires_in: self.refresh_ttl_secs,
        })
    }

    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::debug!("Token verification failed: {}", e);
            AppError::Unauthorized
        })?;

        if token_data.claims.typ != kind {
            tracing::debug!(expected = %kind, actual = %token_data.claims.typ, "Token kind mismatch");
            return Err(AppError::Unauthorized);
        }

        Ok(token_data.claims)
    }
}
