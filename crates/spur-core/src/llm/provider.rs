//! CompletionProvider trait definition.
//!
//! The abstraction every completion backend implements: a single
//! non-streaming prompt-in, text-out call. Uses RPITIT for `complete`.

use spur_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion provider backends (Gemini, etc.).
///
/// Implementations live in spur-infra (e.g., `GeminiProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
