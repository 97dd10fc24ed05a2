//! Registration business logic and token issuance.

mod registration;
mod token_issuer;

pub use registration::{RegistrationService, Registrar};
pub use token_issuer::{Claims, JwtIssuer, TokenIssuer};

#[cfg(any(test, feature = "test-utils"))]
pub use registration::MockRegistrationService;
#[cfg(any(test, feature = "test-utils"))]
pub use token_issuer::MockTokenIssuer;
