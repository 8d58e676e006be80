//! Conversation manager orchestrating one support exchange.
//!
//! `ConversationManager` resolves (or creates) the conversation for a
//! request, persists the customer's message, asks the reply generator for an
//! answer with the full history, persists the answer, and bumps the
//! conversation's `updated_at`. It never classifies provider errors itself;
//! whatever the generator returns is propagated unchanged.

use spur_types::chat::{ChatReply, Message, NewMessage, Sender, new_conversation_id, validate_message};
use spur_types::error::ChatError;
use tracing::{debug, info, warn};

use crate::history::repository::HistoryStore;
use crate::reply::ReplyGenerator;

use super::session_lock::SessionLocks;

/// Orchestrates chat exchanges and history lookups.
///
/// Generic over `HistoryStore` so spur-core never depends on spur-infra.
pub struct ConversationManager<S: HistoryStore> {
    store: S,
    generator: ReplyGenerator,
    locks: SessionLocks,
    serialize_writes: bool,
}

impl<S: HistoryStore> ConversationManager<S> {
    pub fn new(store: S, generator: ReplyGenerator) -> Self {
        Self {
            store,
            generator,
            locks: SessionLocks::new(),
            serialize_writes: false,
        }
    }

    /// Run each exchange under a per-conversation lock.
    pub fn with_serialized_writes(mut self, enabled: bool) -> Self {
        self.serialize_writes = enabled;
        self
    }

    /// Access the history store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the reply generator.
    pub fn generator(&self) -> &ReplyGenerator {
        &self.generator
    }

    /// Handle one customer message.
    ///
    /// A missing, empty, or unknown `session_id` starts a new conversation.
    /// The customer's message stays persisted even when generation fails.
    pub async fn process_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        let text = validate_message(message, self.generator.settings().max_message_chars)?;
        let session_id = self.resolve_session(session_id).await?;

        let result = if self.serialize_writes {
            let guard = self.locks.acquire(&session_id).await;
            let result = self.exchange(&session_id, text).await;
            drop(guard);
            self.locks.prune();
            result
        } else {
            self.exchange(&session_id, text).await
        };

        let reply = result?;
        Ok(ChatReply { reply, session_id })
    }

    /// All messages of a conversation, oldest first.
    ///
    /// Blank or unknown ids yield an empty list rather than an error.
    pub async fn get_history(&self, session_id: &str) -> Result<Vec<Message>, ChatError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Ok(Vec::new());
        }

        let messages = self.store.get_messages(session_id).await?;
        debug!(session_id, count = messages.len(), "Loaded conversation history");
        Ok(messages)
    }

    async fn resolve_session(&self, requested: Option<&str>) -> Result<String, ChatError> {
        if let Some(id) = requested.map(str::trim).filter(|id| !id.is_empty()) {
            if self.store.get_conversation(id).await?.is_some() {
                return Ok(id.to_string());
            }
            debug!(requested = id, "Unknown session id, starting a new conversation");
        }

        let conversation = self
            .store
            .create_conversation(&new_conversation_id())
            .await?;
        info!(session_id = %conversation.id, "Started conversation");
        Ok(conversation.id)
    }

    async fn exchange(&self, session_id: &str, text: &str) -> Result<String, ChatError> {
        self.store
            .create_message(&NewMessage::now(session_id, Sender::User, text))
            .await?;

        let history = self.store.get_messages(session_id).await?;

        let reply = match self.generator.generate_reply(text, &history).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    session_id,
                    code = err.code(),
                    error = %err,
                    "Reply generation failed, customer message kept"
                );
                return Err(err);
            }
        };

        self.store
            .create_message(&NewMessage::now(session_id, Sender::Ai, reply.as_str()))
            .await?;
        self.store.update_conversation(session_id).await?;

        info!(
            session_id,
            history_len = history.len(),
            reply_chars = reply.chars().count(),
            "Exchange completed"
        );
        Ok(reply)
    }
}
