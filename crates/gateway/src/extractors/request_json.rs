//! JSON extractor reporting decode failures in the boundary error format.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use common::AppError;

/// JSON extractor whose rejection is `INVALID_REQUEST_DATA`.
pub struct RequestJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for RequestJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!("Rejected request body: {}", e.body_text());
            AppError::malformed(e.body_text())
        })?;

        Ok(RequestJson(value))
    }
}
