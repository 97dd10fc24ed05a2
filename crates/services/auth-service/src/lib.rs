//! Auth Service Library
//!
//! Runs the registration pipeline on top of the user repository and issues
//! the access and refresh tokens that open a session.

pub mod config;
pub mod service;

pub use config::{AuthServiceConfig, TokenFailurePolicy};
pub use service::{Claims, JwtIssuer, RegistrationService, Registrar, TokenIssuer};
