//! Sign-up handler.

use axum::{extract::State, response::Json, routing::post, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use common::AppResult;
use domain::{RegistrationRequest, RegistrationStage, REGISTRATION_COMPLETED};

use crate::extractors::RequestJson;
use crate::state::AppState;

/// Confirmation body; tokens travel only in cookies.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Account registration completed successfully")]
    pub message: String,
}

/// Create registration routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

/// Register a new account and open a session
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Registration",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Account created; `jwt` and `refresh_token` cookies set", body = MessageResponse),
        (status = 400, description = "Malformed payload, failed validation, weak or mismatched password"),
        (status = 409, description = "Username or email already exists"),
        (status = 500, description = "Hashing, store or token failure")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    RequestJson(request): RequestJson<RegistrationRequest>,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let tokens = state.registration.register(request).await?;

    let jar = state.sessions.establish(jar, &tokens);
    tracing::debug!(stage = %RegistrationStage::SessionEstablished, "Registration stage reached");

    Ok((
        jar,
        Json(MessageResponse {
            message: REGISTRATION_COMPLETED.to_string(),
        }),
    ))
}
