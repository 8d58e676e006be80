//! Application configuration types.
//!
//! `AppConfig` mirrors `config.toml`. Every field has a default so an empty
//! or missing file yields a runnable configuration; secrets (the provider API
//! key) are never part of this struct and come from the environment.

use serde::{Deserialize, Serialize};

use crate::chat::{DEFAULT_HISTORY_WINDOW, MAX_MESSAGE_CHARS};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origin for the web frontend.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// Also mount the chat routes at `/chat` (local dev proxy).
    #[serde(default)]
    pub dev_routes: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_url: default_frontend_url(),
            dev_routes: false,
        }
    }
}

/// Persistent store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite://spur.db?mode=rwc".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    /// Used once the primary model is reported as not found.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_primary_model() -> String {
    "models/gemini-2.5-flash".to_string()
}

fn default_fallback_model() -> String {
    "models/gemini-pro-latest".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_output_tokens: None,
            temperature: None,
        }
    }
}

/// Conversation handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
    /// How many recent messages are rendered into the prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Run each exchange under a per-session lock.
    #[serde(default)]
    pub serialize_session_writes: bool,
}

fn default_max_message_chars() -> usize {
    MAX_MESSAGE_CHARS
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            history_window: default_history_window(),
            serialize_session_writes: false,
        }
    }
}
