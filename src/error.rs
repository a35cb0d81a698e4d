use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Message returned to callers whenever the upstream grading fails.
pub(crate) const PROCESSING_FAILED: &str = "processing failed";

// Taken from https://github.com/tokio-rs/axum/blob/main/examples/anyhow-error-response/src/main.rs
#[derive(Debug)]
pub struct GraderError {
    pub status: StatusCode,
    pub message: HttpErrorResponse,
}

#[derive(Debug, Serialize)]
pub struct HttpErrorResponse {
    error: String,
}

impl From<String> for HttpErrorResponse {
    fn from(message: String) -> Self {
        HttpErrorResponse { error: message }
    }
}

impl From<&str> for HttpErrorResponse {
    fn from(message: &str) -> Self {
        HttpErrorResponse {
            error: message.to_string(),
        }
    }
}

impl GraderError {
    pub(crate) fn bad_request(message: impl Into<HttpErrorResponse>) -> Self {
        GraderError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Logs the full error chain and collapses it into the generic 500 envelope.
    pub(crate) fn upstream(err: anyhow::Error) -> Self {
        error!(error = ?err, "Grading failed");
        GraderError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: HttpErrorResponse::from(PROCESSING_FAILED),
        }
    }
}

impl IntoResponse for GraderError {
    fn into_response(self) -> Response {
        let mut res = Json(self.message).into_response();
        *res.status_mut() = self.status;
        res
    }
}

impl<E> From<E> for GraderError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        GraderError::upstream(err.into())
    }
}

pub type GraderResult<T, E = GraderError> = Result<T, E>;

/// Returns early with an explicit status. Server errors go through `GraderError::upstream`.
#[macro_export]
macro_rules! bail_grader {
    ($status_code:expr, $error_message:expr) => {
        return Err($crate::error::GraderError {
            status: $status_code,
            message: $crate::error::HttpErrorResponse::from($error_message),
        })
    };
    ($status:expr, $fmt:expr $(, $arg:expr)*) => {
        return Err($crate::error::GraderError {
            status: $status,
            message: $crate::error::HttpErrorResponse::from(format!($fmt $(, $arg)*)),
        })
    };
}
