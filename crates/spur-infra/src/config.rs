//! Configuration loader.
//!
//! Reads `config.toml` into [`AppConfig`], falling back to defaults when the
//! file is missing or malformed, then overlays environment variables. The
//! provider API key is read from the environment only.

use std::path::Path;

use secrecy::SecretString;

use spur_types::config::AppConfig;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Load configuration from `path`, then apply environment overrides.
pub async fn load_config(path: &Path) -> AppConfig {
    let mut config = read_config_file(path).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Parse `path` as TOML without looking at the environment.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn read_config_file(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the value of a variable, if set. Unparsable numeric or
/// boolean values are ignored with a warning.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
        }
    }
    if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
        config.database.url = url;
    }
    if let Some(url) = lookup("FRONTEND_URL").filter(|v| !v.trim().is_empty()) {
        config.server.frontend_url = url;
    }
    if let Some(model) = lookup("SPUR_PRIMARY_MODEL").filter(|v| !v.trim().is_empty()) {
        config.llm.primary_model = model;
    }
    if let Some(model) = lookup("SPUR_FALLBACK_MODEL").filter(|v| !v.trim().is_empty()) {
        config.llm.fallback_model = model;
    }
    if let Some(flag) = lookup("SPUR_DEV_ROUTES") {
        match parse_bool(&flag) {
            Some(enabled) => config.server.dev_routes = enabled,
            None => tracing::warn!(value = %flag, "Ignoring invalid SPUR_DEV_ROUTES"),
        }
    }
}

/// Read the provider API key from the process environment.
pub fn api_key_from_env() -> Option<SecretString> {
    resolve_api_key(|key| std::env::var(key).ok())
}

/// Resolve the provider API key through `lookup`; blank values count as unset.
pub fn resolve_api_key<F>(lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(API_KEY_ENV)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
