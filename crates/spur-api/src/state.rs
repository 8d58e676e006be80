//! Application state wiring the conversation manager to its adapters.
//!
//! `ConversationManager` is generic over the history store; AppState pins it
//! to the SQLite implementation and hands it the Gemini provider.

use std::sync::Arc;

use anyhow::Context;

use spur_core::chat::ConversationManager;
use spur_core::llm::box_provider::BoxCompletionProvider;
use spur_core::reply::{GeneratorSettings, ReplyGenerator};
use spur_infra::config::{API_KEY_ENV, api_key_from_env};
use spur_infra::llm::create_provider;
use spur_infra::sqlite::{DatabasePool, SqliteHistoryStore};
use spur_types::config::AppConfig;

/// Concrete manager type used by the CLI and the REST API.
pub type ConcreteConversationManager = ConversationManager<SqliteHistoryStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<ConcreteConversationManager>,
    pub config: Arc<AppConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Connect to the database and build the Gemini-backed manager.
    ///
    /// Fails when the provider API key is not set.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let api_key = api_key_from_env()
            .with_context(|| format!("{API_KEY_ENV} environment variable is required"))?;

        let db_pool = DatabasePool::new(&config.database.url)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.url))?;

        let provider = create_provider(&config.llm, api_key)?;
        Ok(Self::from_parts(config, db_pool, provider))
    }

    /// Wire state from already-constructed adapters.
    pub fn from_parts(
        config: AppConfig,
        db_pool: DatabasePool,
        provider: BoxCompletionProvider,
    ) -> Self {
        let settings = GeneratorSettings::from_config(&config.llm, &config.chat);
        let generator = ReplyGenerator::new(provider, settings);
        let store = SqliteHistoryStore::new(db_pool.clone());
        let conversations = ConversationManager::new(store, generator)
            .with_serialized_writes(config.chat.serialize_session_writes);

        Self {
            conversations: Arc::new(conversations),
            config: Arc::new(config),
            db_pool,
        }
    }
}
