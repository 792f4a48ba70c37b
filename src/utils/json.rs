//! JSON body extractor with API-shaped rejections
//!
//! axum's stock `Json` rejects malformed or incomplete bodies with a
//! plain-text 422. Request bodies here are part of the input contract,
//! so every body rejection becomes a 400 rendered as the usual
//! `{error, code}` JSON instead.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use super::error::ApiError;

pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
