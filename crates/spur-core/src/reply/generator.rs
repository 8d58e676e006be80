//! Reply generation with a single sticky model fallback.
//!
//! `ReplyGenerator` turns a customer message plus conversation history into
//! one support reply. It owns exactly one piece of mutable state: the model
//! currently in use. When the primary model is reported as not found, the
//! generator retries once with the configured fallback and, if that succeeds,
//! keeps using the fallback for every later call.

use tokio::sync::RwLock;
use tracing::{Instrument, debug, error, field, info_span, warn};

use spur_types::chat::{Message, validate_message};
use spur_types::config::{ChatConfig, LlmConfig};
use spur_types::error::ChatError;
use spur_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::llm::box_provider::BoxCompletionProvider;

use super::prompt::SupportPromptBuilder;

/// Static settings for a [`ReplyGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub primary_model: String,
    pub fallback_model: String,
    pub history_window: usize,
    pub max_message_chars: usize,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl GeneratorSettings {
    pub fn from_config(llm: &LlmConfig, chat: &ChatConfig) -> Self {
        Self {
            primary_model: llm.primary_model.clone(),
            fallback_model: llm.fallback_model.clone(),
            history_window: chat.history_window,
            max_message_chars: chat.max_message_chars,
            max_output_tokens: llm.max_output_tokens,
            temperature: llm.temperature,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default(), &ChatConfig::default())
    }
}

/// Produces support replies through a completion provider.
pub struct ReplyGenerator {
    provider: BoxCompletionProvider,
    settings: GeneratorSettings,
    /// Only written after a fallback call has succeeded.
    current_model: RwLock<String>,
}

impl ReplyGenerator {
    pub fn new(provider: BoxCompletionProvider, settings: GeneratorSettings) -> Self {
        let current_model = RwLock::new(settings.primary_model.clone());
        Self {
            provider,
            settings,
            current_model,
        }
    }

    /// The model the next call will start with.
    pub async fn current_model(&self) -> String {
        self.current_model.read().await.clone()
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate a reply to `user_message` given the conversation so far.
    ///
    /// Validation failures return before the provider is contacted. Provider
    /// failures are classified into [`ChatError`] here and nowhere else.
    pub async fn generate_reply(
        &self,
        user_message: &str,
        history: &[Message],
    ) -> Result<String, ChatError> {
        let message = validate_message(user_message, self.settings.max_message_chars)?;
        let prompt = SupportPromptBuilder::build(message, history, self.settings.history_window);

        let model = self.current_model().await;
        debug!(
            model = %model,
            history_len = history.len(),
            prompt_chars = prompt.len(),
            "Generating reply"
        );

        let response = match self.complete(&model, &prompt).await {
            Ok(response) => response,
            Err(err) if err.is_model_not_found() && model != self.settings.fallback_model => {
                let fallback = self.settings.fallback_model.clone();
                warn!(
                    primary = %model,
                    fallback = %fallback,
                    error = %err,
                    "Model not found, retrying with fallback model"
                );

                match self.complete(&fallback, &prompt).await {
                    Ok(response) => {
                        *self.current_model.write().await = fallback.clone();
                        warn!(model = %fallback, "Switched to fallback model");
                        response
                    }
                    Err(fallback_err) => {
                        error!(
                            primary_error = %err,
                            fallback_error = %fallback_err,
                            "Fallback model also failed"
                        );
                        return Err(classify_llm_error(&err));
                    }
                }
            }
            Err(err) => {
                error!(model = %model, error = %err, "Reply generation failed");
                return Err(classify_llm_error(&err));
            }
        };

        let reply = response.content.trim();
        if reply.is_empty() {
            warn!(model = %response.model, "Provider returned an empty reply");
            return Err(ChatError::EmptyResponse);
        }

        Ok(reply.to_string())
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<CompletionResponse, LlmError> {
        let request = CompletionRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            max_output_tokens: self.settings.max_output_tokens,
            temperature: self.settings.temperature,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = ?request.max_output_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
        );

        let response = self
            .provider
            .complete(&request)
            .instrument(span.clone())
            .await?;

        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
        Ok(response)
    }
}

/// Map a provider failure onto the user-facing error taxonomy.
///
/// Checked in order: credentials, rate limiting, timeout, missing model.
/// Anything else keeps the provider text as detail for logging.
pub fn classify_llm_error(err: &LlmError) -> ChatError {
    if err.is_auth_failure() {
        ChatError::AuthError
    } else if err.is_rate_limited() {
        ChatError::RateLimited
    } else if err.is_timeout() {
        ChatError::Timeout
    } else if err.is_model_not_found() {
        ChatError::ModelUnavailable
    } else {
        ChatError::GenerationFailed {
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CANNED_REPLY, ScriptedProvider};
    use chrono::{Duration, Utc};
    use spur_types::chat::Sender;

    const PRIMARY: &str = "models/primary-test";
    const FALLBACK: &str = "models/fallback-test";

    fn settings() -> GeneratorSettings {
        GeneratorSettings {
            primary_model: PRIMARY.to_string(),
            fallback_model: FALLBACK.to_string(),
            ..GeneratorSettings::default()
        }
    }

    fn generator(provider: &ScriptedProvider) -> ReplyGenerator {
        ReplyGenerator::new(BoxCompletionProvider::new(provider.clone()), settings())
    }

    fn not_found() -> LlmError {
        LlmError::ModelNotFound {
            model: PRIMARY.to_string(),
        }
    }

    fn history(count: usize) -> Vec<Message> {
        let base = Utc::now();
        (1..=count)
            .map(|i| Message {
                id: format!("msg_{i:02}"),
                conversation_id: "conv_t".to_string(),
                sender: if i % 2 == 1 { Sender::User } else { Sender::Ai },
                text: format!("msg-{i:02}-text"),
                timestamp: base + Duration::seconds(i as i64),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let provider = ScriptedProvider::new();
        provider.push_ok("  We accept returns within 30 days.\n");
        let generator = generator(&provider);

        let reply = generator.generate_reply("Returns?", &[]).await.unwrap();
        assert_eq!(reply, "We accept returns within 30 days.");
        assert_eq!(provider.models_called(), vec![PRIMARY]);
    }

    #[tokio::test]
    async fn test_prompt_includes_only_last_ten_messages() {
        let provider = ScriptedProvider::new();
        let generator = generator(&provider);

        generator
            .generate_reply("What about shipping?", &history(15))
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0].prompt;

        for i in 1..=5 {
            assert!(!prompt.contains(&format!("msg-{i:02}-text")));
        }
        let mut last = 0;
        for i in 6..=15 {
            let label = if i % 2 == 1 { "Customer" } else { "Support Agent" };
            let line = format!("{label}: msg-{i:02}-text");
            let pos = prompt.find(&line).expect("windowed message missing");
            assert!(pos > last);
            last = pos;
        }
        assert!(prompt.ends_with("Customer: What about shipping?\nSupport Agent:"));
    }

    #[tokio::test]
    async fn test_empty_history_placeholder_in_request() {
        let provider = ScriptedProvider::new();
        let generator = generator(&provider);

        generator.generate_reply("Hi", &[]).await.unwrap();
        assert!(provider.requests()[0].prompt.contains("(No previous messages)"));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_provider() {
        let provider = ScriptedProvider::new();
        let generator = generator(&provider);

        let err = generator.generate_reply("   ", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput));

        let long = "x".repeat(2001);
        let err = generator.generate_reply(&long, &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::MessageTooLong { length: 2001, .. }));

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_once_and_sticky() {
        let provider = ScriptedProvider::new();
        provider.push_err(not_found()).push_ok("from fallback");
        let generator = generator(&provider);

        let reply = generator.generate_reply("Hello", &[]).await.unwrap();
        assert_eq!(reply, "from fallback");
        assert_eq!(provider.models_called(), vec![PRIMARY, FALLBACK]);
        assert_eq!(generator.current_model().await, FALLBACK);

        generator.generate_reply("Again", &[]).await.unwrap();
        assert_eq!(provider.models_called(), vec![PRIMARY, FALLBACK, FALLBACK]);
    }

    #[tokio::test]
    async fn test_fallback_triggered_by_404_text() {
        let provider = ScriptedProvider::new();
        provider.push_err(LlmError::Provider {
            status: Some(400),
            message: "models/primary-test is not found for API version v1beta".to_string(),
        });
        let generator = generator(&provider);

        let reply = generator.generate_reply("Hello", &[]).await.unwrap();
        assert_eq!(reply, CANNED_REPLY);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fallback_failure_returns_original_classification() {
        let provider = ScriptedProvider::new();
        provider.push_err(not_found()).push_err(LlmError::RateLimited {
            retry_after_ms: None,
        });
        let generator = generator(&provider);

        let err = generator.generate_reply("Hello", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::ModelUnavailable));
        assert_eq!(provider.call_count(), 2);
        assert_eq!(generator.current_model().await, PRIMARY);
    }

    #[tokio::test]
    async fn test_no_fallback_when_already_on_fallback() {
        let provider = ScriptedProvider::new();
        provider
            .push_err(not_found())
            .push_ok("ok")
            .push_err(LlmError::ModelNotFound {
                model: FALLBACK.to_string(),
            });
        let generator = generator(&provider);

        generator.generate_reply("one", &[]).await.unwrap();
        let err = generator.generate_reply("two", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::ModelUnavailable));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_fallback() {
        let provider = ScriptedProvider::new();
        provider.push_err(LlmError::Provider {
            status: Some(500),
            message: "internal".to_string(),
        });
        let generator = generator(&provider);

        let err = generator.generate_reply("Hello", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::GenerationFailed { .. }));
        assert_eq!(provider.models_called(), vec![PRIMARY]);
        assert_eq!(generator.current_model().await, PRIMARY);
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_empty_response() {
        let provider = ScriptedProvider::new();
        provider.push_ok(" \n\t ");
        let generator = generator(&provider);

        let err = generator.generate_reply("Hello", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyResponse));
    }

    #[test]
    fn test_classification() {
        assert!(matches!(
            classify_llm_error(&LlmError::AuthenticationFailed("bad key".to_string())),
            ChatError::AuthError
        ));
        assert!(matches!(
            classify_llm_error(&LlmError::Provider {
                status: Some(400),
                message: "API key not valid".to_string(),
            }),
            ChatError::AuthError
        ));
        assert!(matches!(
            classify_llm_error(&LlmError::RateLimited {
                retry_after_ms: Some(1000)
            }),
            ChatError::RateLimited
        ));
        assert!(matches!(
            classify_llm_error(&LlmError::Provider {
                status: None,
                message: "Quota exceeded".to_string(),
            }),
            ChatError::RateLimited
        ));
        assert!(matches!(
            classify_llm_error(&LlmError::Timeout),
            ChatError::Timeout
        ));
        assert!(matches!(classify_llm_error(&not_found()), ChatError::ModelUnavailable));

        match classify_llm_error(&LlmError::Deserialization("bad json".to_string())) {
            ChatError::GenerationFailed { detail } => assert!(detail.contains("bad json")),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_settings_from_config() {
        let llm = LlmConfig {
            temperature: Some(0.2),
            ..LlmConfig::default()
        };
        let chat = ChatConfig {
            history_window: 4,
            ..ChatConfig::default()
        };
        let settings = GeneratorSettings::from_config(&llm, &chat);
        assert_eq!(settings.primary_model, "models/gemini-2.5-flash");
        assert_eq!(settings.fallback_model, "models/gemini-pro-latest");
        assert_eq!(settings.history_window, 4);
        assert_eq!(settings.temperature, Some(0.2));
    }
}
