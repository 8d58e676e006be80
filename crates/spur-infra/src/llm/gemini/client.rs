//! GeminiProvider -- [`CompletionProvider`] for the Google Gemini REST API.
//!
//! Sends single-turn, non-streaming `generateContent` requests. The API key
//! travels in the `x-goog-api-key` header and is held as a [`SecretString`]
//! so it never shows up in logs or `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use spur_core::llm::provider::CompletionProvider;
use spur_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::types::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    RequestContent, RequestPart,
};

/// Google Gemini completion provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    /// Create a provider whose requests give up after `timeout`.
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `{base}/models/{model}:generateContent`, accepting ids with or without
    /// the `models/` prefix.
    fn url(&self, model: &str) -> String {
        if model.starts_with("models/") {
            format!("{}/{model}:generateContent", self.base_url)
        } else {
            format!("{}/models/{model}:generateContent", self.base_url)
        }
    }

    fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
        let generation_config =
            if request.max_output_tokens.is_some() || request.temperature.is_some() {
                Some(GenerationConfig {
                    max_output_tokens: request.max_output_tokens,
                    temperature: request.temperature,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config,
        }
    }
}

/// Map a non-success HTTP status and its body onto [`LlmError`].
fn error_for_status(status: u16, model: &str, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => LlmError::AuthenticationFailed(message),
        400 if message.to_lowercase().contains("api key") => {
            LlmError::AuthenticationFailed(message)
        }
        404 => LlmError::ModelNotFound {
            model: model.to_string(),
        },
        408 | 504 => LlmError::Timeout,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        _ => LlmError::Provider {
            status: Some(status),
            message: format!("HTTP {status}: {message}"),
        },
    }
}

impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.url(&request.model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Provider {
                        status: None,
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %error_body, "Gemini request rejected");
            return Err(error_for_status(status.as_u16(), &request.model, &error_body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        if let Some(reason) = parsed.block_reason() {
            return Err(LlmError::InvalidRequest(format!("prompt blocked: {reason}")));
        }

        let usage = parsed
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: parsed.text().unwrap_or_default(),
            model: parsed
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            finish_reason: parsed.finish_reason(),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const MODEL: &str = "models/gemini-2.5-flash";
    const PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn provider(base_url: &str) -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url)
    }

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            prompt: "Customer: hi\nSupport Agent:".to_string(),
            max_output_tokens: None,
            temperature: None,
        }
    }

    #[test]
    fn test_url_prefixes_models() {
        let p = provider("http://localhost/v1beta/");
        assert_eq!(
            p.url("gemini-pro-latest"),
            "http://localhost/v1beta/models/gemini-pro-latest:generateContent"
        );
        assert_eq!(
            p.url("models/gemini-pro-latest"),
            "http://localhost/v1beta/models/gemini-pro-latest:generateContent"
        );
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"Customer: hi\nSupport Agent:"}]}]}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {"parts": [{"text": "Hi! How can I help?"}], "role": "model"},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 6}
                }"#,
            )
            .create_async()
            .await;

        let response = provider(&server.url()).complete(&request(MODEL)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "Hi! How can I help?");
        assert_eq!(response.model, MODEL);
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.input_tokens, 40);
        assert_eq!(response.usage.output_tokens, 6);
    }

    #[tokio::test]
    async fn test_generation_config_sent_when_set() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJsonString(
                r#"{"generationConfig":{"maxOutputTokens":128,"temperature":0.5}}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
            .create_async()
            .await;

        let mut req = request(MODEL);
        req.max_output_tokens = Some(128);
        req.temperature = Some(0.5);
        provider(&server.url()).complete(&req).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_maps_to_model_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(404)
            .with_body(
                r#"{"error":{"code":404,"message":"models/gemini-2.5-flash is not found for API version v1beta","status":"NOT_FOUND"}}"#,
            )
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(&request(MODEL))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ModelNotFound { .. }));
        assert!(err.is_model_not_found());
    }

    #[tokio::test]
    async fn test_invalid_key_maps_to_auth() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(400)
            .with_body(
                r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
            )
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(&request(MODEL))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_and_server_error() {
        let mut server = Server::new_async().await;
        let _limited = server
            .mock("POST", PATH)
            .with_status(429)
            .with_body(r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let p = provider(&server.url());
        let err = p.complete(&request(MODEL)).await.unwrap_err();
        assert!(err.is_rate_limited());

        let _broken = server
            .mock("POST", "/models/other:generateContent")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;
        let err = p.complete(&request("other")).await.unwrap_err();
        match err {
            LlmError::Provider { status, message } => {
                assert_eq!(status, Some(500));
                assert!(message.contains("upstream exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(&request(MODEL))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_deserialization_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(&request(MODEL))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[test]
    fn test_error_for_status_mapping() {
        assert!(matches!(
            error_for_status(403, MODEL, "forbidden"),
            LlmError::AuthenticationFailed(_)
        ));
        assert!(matches!(error_for_status(504, MODEL, ""), LlmError::Timeout));
        assert!(matches!(
            error_for_status(400, MODEL, "bad field"),
            LlmError::Provider {
                status: Some(400),
                ..
            }
        ));
    }
}
