//! Unified error handling for the registration boundary.
//!
//! Every failure inside the workspace ends up as one `AppError`, which maps
//! to exactly one stable client-facing code and an HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Stable Error Codes
// =============================================================================

pub const INVALID_REQUEST_DATA: &str = "INVALID_REQUEST_DATA";
pub const WEAK_PASSWORD: &str = "WEAK_PASSWORD";
pub const PASSWORD_MISMATCH: &str = "PASSWORD_MISMATCH";
pub const OPERATION_FAILED: &str = "OPERATION_FAILED";
pub const AUTHENTICATION_FAILED: &str = "AUTHENTICATION_FAILED";

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Request decoding
    #[error("Invalid request data: {0}")]
    MalformedRequest(String),

    // Validation
    #[error("Terms must be accepted")]
    TermsNotAccepted,

    #[error("Invalid username")]
    InvalidUsername,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Password too long (max {} bytes)", domain::MAX_CREDENTIAL_BYTES)]
    CredentialTooLong,

    // Conflicts
    #[error("Username or email already exists")]
    DuplicateIdentity,

    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    // Server-side failures
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store operation failed: {0}")]
    StoreOperationFailed(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuanceFailed(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MalformedRequest(_)
            | AppError::TermsNotAccepted
            | AppError::InvalidUsername
            | AppError::InvalidEmail
            | AppError::CredentialTooLong => INVALID_REQUEST_DATA,
            AppError::WeakPassword(_) => WEAK_PASSWORD,
            AppError::PasswordMismatch => PASSWORD_MISMATCH,
            AppError::DuplicateIdentity
            | AppError::HashingFailed(_)
            | AppError::StoreUnavailable(_)
            | AppError::StoreOperationFailed(_) => OPERATION_FAILED,
            AppError::TokenIssuanceFailed(_) | AppError::Unauthorized => AUTHENTICATION_FAILED,
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedRequest(_)
            | AppError::TermsNotAccepted
            | AppError::InvalidUsername
            | AppError::InvalidEmail
            | AppError::PasswordMismatch
            | AppError::WeakPassword(_)
            | AppError::CredentialTooLong => StatusCode::BAD_REQUEST,
            AppError::DuplicateIdentity => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller caused this error and can fix it by resubmitting
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::MalformedRequest(_) => "Invalid request data".to_string(),
            AppError::WeakPassword(reason) => reason.clone(),

            // Hide details for internal errors
            AppError::HashingFailed(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                "Server error".to_string()
            }
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                "Server error".to_string()
            }
            AppError::StoreOperationFailed(msg) => {
                tracing::error!("Store operation failed: {}", msg);
                "Server error".to_string()
            }
            AppError::TokenIssuanceFailed(msg) => {
                tracing::error!("Token issuance failed: {}", msg);
                "Failed to generate tokens".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::TermsNotAccepted => AppError::TermsNotAccepted,
            DomainError::InvalidUsername => AppError::InvalidUsername,
            DomainError::InvalidEmail => AppError::InvalidEmail,
            DomainError::PasswordMismatch => AppError::PasswordMismatch,
            DomainError::WeakPassword(reason) => AppError::WeakPassword(reason),
            DomainError::CredentialTooLong => AppError::CredentialTooLong,
            DomainError::HashingFailed(msg) => AppError::HashingFailed(msg),
        }
    }
}

// =============================================================================
// Store Error Conversion
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::{DbErr, SqlErr};

        // The store's unique index is the only arbiter of identity conflicts.
        if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return AppError::DuplicateIdentity;
        }

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => AppError::StoreUnavailable(err.to_string()),
            other => AppError::StoreOperationFailed(other.to_string()),
        }
    }
}

// =============================================================================
// Token Error Conversion
// =============================================================================

#[cfg(feature = "jwt")]
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::TokenIssuanceFailed(err.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        AppError::MalformedRequest(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        AppError::StoreUnavailable(msg.into())
    }

    pub fn store_failed(msg: impl Into<String>) -> Self {
        AppError::StoreOperationFailed(msg.into())
    }

    pub fn token_failed(msg: impl Into<String>) -> Self {
        AppError::TokenIssuanceFailed(msg.into())
    }

    pub fn hashing_failed(msg: impl Into<String>) -> Self {
        AppError::HashingFailed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_invalid_request_data() {
        for err in [
            AppError::malformed("bad json"),
            AppError::TermsNotAccepted,
            AppError::InvalidUsername,
            AppError::InvalidEmail,
            AppError::CredentialTooLong,
        ] {
            assert_eq!(err.code(), INVALID_REQUEST_DATA);
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_password_errors_have_dedicated_codes() {
        assert_eq!(AppError::WeakPassword("x".into()).code(), WEAK_PASSWORD);
        assert_eq!(AppError::PasswordMismatch.code(), PASSWORD_MISMATCH);
        assert_eq!(AppError::PasswordMismatch.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_identity_is_conflict() {
        let err = AppError::DuplicateIdentity;
        assert_eq!(err.code(), OPERATION_FAILED);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_server_errors_are_500() {
        for err in [
            AppError::hashing_failed("rng"),
            AppError::store_unavailable("timeout"),
            AppError::store_failed("syntax"),
            AppError::token_failed("key"),
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!err.is_client_error());
        }
        assert_eq!(AppError::token_failed("key").code(), AUTHENTICATION_FAILED);
        assert_eq!(AppError::store_unavailable("x").code(), OPERATION_FAILED);
    }

    #[test]
    fn test_server_messages_hide_details() {
        let msg = AppError::store_failed("relation \"users\" does not exist").user_message();
        assert_eq!(msg, "Server error");
        assert!(!AppError::token_failed("missing key").user_message().contains("key"));
    }

    #[test]
    fn test_domain_errors_convert() {
        assert!(matches!(
            AppError::from(DomainError::TermsNotAccepted),
            AppError::TermsNotAccepted
        ));
        assert!(matches!(
            AppError::from(DomainError::CredentialTooLong),
            AppError::CredentialTooLong
        ));
        assert!(matches!(
            AppError::from(DomainError::hashing_failed("x")),
            AppError::HashingFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = AppError::PasswordMismatch.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["code"], PASSWORD_MISMATCH);
        assert_eq!(body["error"]["message"], "Passwords do not match");
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_store_errors_classified() {
        use sea_orm::{DbErr, RuntimeErr};

        let unavailable = AppError::from(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert!(matches!(unavailable, AppError::StoreUnavailable(_)));

        let failed = AppError::from(DbErr::Exec(RuntimeErr::Internal("bad".into())));
        assert!(matches!(failed, AppError::StoreOperationFailed(_)));
    }
}
