use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::PredictError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Predict(#[from] PredictError),

    /// Any other failure while a prediction was running.
    #[error("{0}")]
    Pipeline(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidPayload(String),

    #[error("Payload too large: max {0}MB allowed")]
    PayloadTooLarge(usize),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
///
/// `detail` carries the message in the shape the web frontend reads;
/// `error` adds a stable code.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    ///
    /// Every prediction failure is a 400, whether the input was bad or the
    /// model call failed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Predict(_) | ServerError::Pipeline(_) | ServerError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Predict(err) => err.code(),
            ServerError::Pipeline(_) => "PIPELINE_ERROR",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = ErrorResponse {
            detail: message.clone(),
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
