//! Completion provider implementations.
//!
//! Contains the Gemini implementation of the [`CompletionProvider`] trait
//! defined in `spur-core`, and a factory ([`create_provider`]) that builds
//! it from [`LlmConfig`].
//!
//! [`CompletionProvider`]: spur_core::llm::provider::CompletionProvider

pub mod gemini;

use std::time::Duration;

use secrecy::SecretString;

use spur_core::llm::box_provider::BoxCompletionProvider;
use spur_types::config::LlmConfig;
use spur_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Create a [`BoxCompletionProvider`] from configuration and a resolved API key.
pub fn create_provider(
    config: &LlmConfig,
    api_key: SecretString,
) -> Result<BoxCompletionProvider, LlmError> {
    let provider = GeminiProvider::new(api_key, Duration::from_secs(config.request_timeout_secs))?
        .with_base_url(config.base_url.clone());

    tracing::info!(
        provider = "gemini",
        primary_model = %config.primary_model,
        fallback_model = %config.fallback_model,
        "Completion provider configured"
    );
    Ok(BoxCompletionProvider::new(provider))
}
