use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{GraderError, HttpErrorResponse};

pub(crate) const INVALID_BODY: &str = "request body must be a JSON object with topic and text";

/// JSON body extractor that ignores the `Content-Type` header and answers malformed
/// bodies with the regular error envelope instead of axum's plain-text rejection.
pub(crate) struct JsonPayload<T>(pub(crate) T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GraderError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| GraderError {
                status: rejection.status(),
                message: HttpErrorResponse::from(rejection.body_text()),
            })?;

        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(|rejection| {
            warn!(%rejection, "Rejected request body");
            GraderError::bad_request(INVALID_BODY)
        })?;
        Ok(JsonPayload(value))
    }
}
