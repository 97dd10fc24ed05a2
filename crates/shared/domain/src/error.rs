//! Domain-level errors.
//!
//! These errors represent registration rule violations and credential
//! failures. They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

use crate::constants::MAX_CREDENTIAL_BYTES;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Terms of service were not accepted
    #[error("Terms must be accepted")]
    TermsNotAccepted,

    /// Username violates the username policy
    #[error("Invalid username")]
    InvalidUsername,

    /// Email address is not syntactically valid
    #[error("Invalid email")]
    InvalidEmail,

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password violates the strength policy
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Password exceeds the hashing primitive's input limit
    #[error("Password too long (max {} bytes)", MAX_CREDENTIAL_BYTES)]
    CredentialTooLong,

    /// The hashing primitive failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

impl DomainError {
    /// Create a weak password error
    pub fn weak_password(reason: impl Into<String>) -> Self {
        DomainError::WeakPassword(reason.into())
    }

    /// Create a hashing failure
    pub fn hashing_failed(msg: impl Into<String>) -> Self {
        DomainError::HashingFailed(msg.into())
    }

    /// Whether the caller can fix this error by resubmitting corrected input
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DomainError::HashingFailed(_))
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
