//! HTTP request handlers.

pub mod health_handler;
pub mod signup_handler;

pub use health_handler::health_routes;
pub use signup_handler::auth_routes;
