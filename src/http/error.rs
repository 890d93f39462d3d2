//! HTTP error handling
//!
//! Every failure leaves the server as `{"error": <message>, "status": <code>}`
//! with the matching status line.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// JSON error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpError {
    /// User-facing error message
    pub error: String,
    /// Numeric HTTP status, repeated in the body
    pub status: u16,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            status: status.as_u16(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Opaque 500; details stay in the server log
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error")
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(message) => HttpError::bad_request(message),
            ApiError::NodeNotFound(_) => HttpError::not_found(err.to_string()),
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                HttpError::internal()
            }
        }
    }
}

impl From<BytesRejection> for HttpError {
    fn from(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpError::new(status, "Request body is too large");
        }
        tracing::debug!(error = %rejection.body_text(), "unreadable request body");
        HttpError::new(status, "Request body could not be read")
    }
}
