use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use medlab_api::ApiError;

/// JSON request body whose rejections are answered with the API error body
/// instead of axum's plain-text one.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "rejected request body");
            ApiError::from(rejection)
        })?;
        Ok(Self(value))
    }
}
