use thiserror::Error;

/// Errors from repository operations (used by trait definitions in spur-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the conversation core.
///
/// Provider failures are classified into this taxonomy exactly once, by the
/// reply generator. Callers only propagate these values; the HTTP layer picks
/// status codes and user-facing wording from the variant.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    InvalidInput,

    #[error(
        "Message is too long. Maximum length is {max} characters. Your message has {length} characters."
    )]
    MessageTooLong { length: usize, max: usize },

    #[error("Empty response from LLM")]
    EmptyResponse,

    #[error("Invalid API key. Please check the provider credentials.")]
    AuthError,

    #[error("API rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Model not available. Please check the model name.")]
    ModelUnavailable,

    #[error("Failed to generate reply: {detail}")]
    GenerationFailed { detail: String },

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl ChatError {
    /// Whether the error was caused by the request itself (HTTP 400 class).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChatError::InvalidInput | ChatError::MessageTooLong { .. })
    }

    /// Stable machine-readable code for logs and API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::InvalidInput => "INVALID_INPUT",
            ChatError::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            ChatError::EmptyResponse => "EMPTY_RESPONSE",
            ChatError::AuthError => "AUTH_ERROR",
            ChatError::RateLimited => "RATE_LIMITED",
            ChatError::Timeout => "TIMEOUT",
            ChatError::ModelUnavailable => "MODEL_UNAVAILABLE",
            ChatError::GenerationFailed { .. } => "GENERATION_FAILED",
            ChatError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
