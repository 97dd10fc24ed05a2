//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::handlers::signup_handler::MessageResponse;
use domain::RegistrationRequest;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::signup_handler::signup,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            RegistrationRequest,
            MessageResponse,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Registration", description = "Account sign-up"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;
