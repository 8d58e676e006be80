//! LLM request/response types for the completion provider.
//!
//! The provider contract is single-turn: one prompt string in, one text out.
//! These types are provider-agnostic; the Gemini wire format lives in
//! spur-infra.

use serde::{Deserialize, Serialize};

/// Request to a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Provider model identifier (e.g. "models/gemini-2.5-flash").
    pub model: String,
    /// Full prompt text, sent as a single user turn.
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from completion provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("request timeout")]
    Timeout,

    #[error("model not found: {model}")]
    ModelNotFound { model: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmError {
    /// Whether this error means the requested model or route does not exist.
    ///
    /// Matches the explicit variant, a 404 status, or well-known error text.
    pub fn is_model_not_found(&self) -> bool {
        match self {
            LlmError::ModelNotFound { .. } => true,
            LlmError::Provider { status: Some(404), .. } => true,
            LlmError::Provider { message, .. } | LlmError::InvalidRequest(message) => {
                let lower = message.to_lowercase();
                lower.contains("not found")
                    || lower.contains("404")
                    || lower.contains("does not exist")
            }
            _ => false,
        }
    }

    /// Whether this error is a credential problem.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            LlmError::AuthenticationFailed(_) => true,
            LlmError::Provider { status: Some(401 | 403), .. } => true,
            LlmError::Provider { message, .. } | LlmError::InvalidRequest(message) => {
                let lower = message.to_lowercase();
                lower.contains("api key") || lower.contains("api_key")
            }
            _ => false,
        }
    }

    /// Whether this error is a rate-limit or quota rejection.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::Provider { status: Some(429), .. } => true,
            LlmError::Provider { message, .. } => {
                let lower = message.to_lowercase();
                lower.contains("quota")
                    || lower.contains("rate limit")
                    || lower.contains("resource_exhausted")
            }
            _ => false,
        }
    }

    /// Whether the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            LlmError::Timeout => true,
            LlmError::Provider { status: Some(408 | 504), .. } => true,
            LlmError::Provider { message, .. } => {
                let lower = message.to_lowercase();
                lower.contains("timeout") || lower.contains("timed out")
            }
            _ => false,
        }
    }
}
