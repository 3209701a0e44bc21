//! Error types for the Subscription API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use vitrina_subscription_core::SubscriptionError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Subscriber not found")]
    SubscriberNotFound,

    #[error("Store not found")]
    StoreNotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SubscriberNotFound | Self::StoreNotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SubscriberNotFound => "SUBSCRIBER_NOT_FOUND",
            Self::StoreNotFound => "STORE_NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::InvalidInput(msg) => Self::BadRequest(msg),
            SubscriptionError::SubscriberNotFound => Self::SubscriberNotFound,
            // Store/internal failures are logged with context and surfaced
            // as a generic error; details never reach the caller.
            e => {
                tracing::error!(error = %e, "Subscription operation failed");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
