//! Domain layer - Registration entities, rules and credential handling.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The services and the gateway share these types.

pub mod constants;
pub mod error;
pub mod password;
pub mod registration;
pub mod token;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{Argon2Primitive, CredentialHasher, HashPrimitive, HashingParams, Password};
pub use registration::{RegistrationRequest, RegistrationStage};
pub use token::{TokenKind, TokenPair};
pub use user::{PasswordHistoryEntry, User};
pub use validation::{PasswordPolicy, RegistrationValidator, UsernamePolicy};

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockHashPrimitive;
