//! Common utilities shared across the services and the gateway.
//!
//! This crate provides:
//! - The boundary error type with stable client codes
//! - Configuration structures and environment helpers

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
