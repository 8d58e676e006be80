//! Application error type mapping to HTTP status codes and `{ "error": ... }` bodies.
//!
//! Provider and storage details are logged here and never sent to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use spur_types::error::ChatError;

pub const CONFIGURATION_MESSAGE: &str = "Service configuration error. Please contact support.";
pub const HIGH_DEMAND_MESSAGE: &str =
    "Service is temporarily unavailable due to high demand. Please try again in a moment.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please check your connection and try again.";
pub const AI_UNAVAILABLE_MESSAGE: &str =
    "AI service is temporarily unavailable. Please try again in a moment.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure from the conversation core.
    Chat(ChatError),
    /// Malformed request (bad JSON, missing fields).
    BadRequest(String),
    /// Internal failure with a fixed client-facing message.
    Internal(&'static str),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    /// Status code and client-safe message.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Chat(err) => match err {
                ChatError::InvalidInput | ChatError::MessageTooLong { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                ChatError::AuthError => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CONFIGURATION_MESSAGE.to_string(),
                ),
                ChatError::RateLimited => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    HIGH_DEMAND_MESSAGE.to_string(),
                ),
                ChatError::Timeout => (StatusCode::GATEWAY_TIMEOUT, TIMEOUT_MESSAGE.to_string()),
                ChatError::ModelUnavailable
                | ChatError::GenerationFailed { .. }
                | ChatError::EmptyResponse => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    AI_UNAVAILABLE_MESSAGE.to_string(),
                ),
                ChatError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_MESSAGE.to_string(),
                ),
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            AppError::Chat(err) if !err.is_client_error() => {
                tracing::error!(code = err.code(), error = %err, status = status.as_u16(), "Request failed");
            }
            AppError::Chat(err) => {
                tracing::debug!(code = err.code(), error = %err, "Rejected message");
            }
            AppError::BadRequest(msg) => tracing::debug!(%msg, "Bad request"),
            AppError::Internal(msg) => tracing::error!(%msg, "Internal error"),
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
