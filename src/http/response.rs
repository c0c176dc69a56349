//! Response encoding.
//!
//! # Responsibilities
//! - Encode `{"message": ...}` JSON bodies
//! - Map request-local failures to status codes and bodies
//!
//! # Design Decisions
//! - Serialization failures become a 500 with a structured `{"error": ...}` body
//! - Domain outcomes (conflict, missing key) are plain text, not errors

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// JSON body shared by every successful JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Failure local to one request. Never touches store state.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("query parameter 'k' must be a non-empty key")]
    MissingKey,

    #[error("failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingKey => StatusCode::BAD_REQUEST,
            ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::MissingKey => (status, self.to_string()).into_response(),
            ApiError::Serialization(ref e) => {
                tracing::error!(error = %e, "Response encoding failed");
                let body = serde_json::to_vec(&ErrorBody {
                    error: e.to_string(),
                })
                .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec());
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
        }
    }
}

/// Serialize `body` into a JSON response with the given status.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(body)?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}

/// Plain-text response with the given status.
pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    (status, body.into()).into_response()
}
