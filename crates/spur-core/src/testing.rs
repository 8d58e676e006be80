//! Test doubles shared by the core unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use spur_types::chat::{Conversation, Message, NewMessage, new_message_id};
use spur_types::error::RepositoryError;
use spur_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use crate::history::repository::HistoryStore;
use crate::llm::provider::CompletionProvider;

/// Completion provider that replays a script of outcomes and records every
/// request it receives. Once the script runs dry it answers with a canned reply.
#[derive(Clone, Default)]
pub(crate) struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Option<Duration>,
}

pub(crate) const CANNED_REPLY: &str = "Happy to help with that!";

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn push_ok(&self, content: &str) -> &Self {
        self.script.lock().unwrap().push_back(Ok(content.to_string()));
        self
    }

    pub(crate) fn push_err(&self, err: LlmError) -> &Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn models_called(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.model).collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        let content = match next {
            Some(outcome) => outcome?,
            None => CANNED_REPLY.to_string(),
        };

        Ok(CompletionResponse {
            content,
            model: request.model.clone(),
            finish_reason: Some("STOP".to_string()),
            usage: Usage {
                input_tokens: 100,
                output_tokens: 20,
            },
        })
    }
}

/// In-memory history store.
#[derive(Clone, Default)]
pub(crate) struct MemoryHistoryStore {
    conversations: Arc<Mutex<HashMap<String, Conversation>>>,
    messages: Arc<Mutex<Vec<Message>>>,
    fail_writes: bool,
}

impl MemoryHistoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A store whose message inserts always fail.
    pub(crate) fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub(crate) fn conversation_count(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }

    pub(crate) fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl HistoryStore for MemoryHistoryStore {
    async fn create_conversation(&self, id: &str) -> Result<Conversation, RepositoryError> {
        let now = Utc::now();
        let conversation = Conversation {
            id: id.to_string(),
            created_at: now,
            updated_at: now,
        };
        let mut conversations = self.conversations.lock().unwrap();
        if conversations.contains_key(id) {
            return Err(RepositoryError::Conflict(format!("conversation {id} exists")));
        }
        conversations.insert(id.to_string(), conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.conversations.lock().unwrap().get(id).cloned())
    }

    async fn update_conversation(&self, id: &str) -> Result<(), RepositoryError> {
        let mut conversations = self.conversations.lock().unwrap();
        let conversation = conversations.get_mut(id).ok_or(RepositoryError::NotFound)?;
        conversation.updated_at = Utc::now();
        Ok(())
    }

    async fn create_message(&self, message: &NewMessage) -> Result<String, RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Query("disk I/O error".to_string()));
        }
        if !self
            .conversations
            .lock()
            .unwrap()
            .contains_key(&message.conversation_id)
        {
            return Err(RepositoryError::Query("FOREIGN KEY constraint failed".to_string()));
        }

        let id = new_message_id();
        self.messages.lock().unwrap().push(Message {
            id: id.clone(),
            conversation_id: message.conversation_id.clone(),
            sender: message.sender,
            text: message.text.clone(),
            timestamp: message.timestamp,
        });
        Ok(id)
    }

    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RepositoryError> {
        // Insertion order is already chronological; the stable sort keeps ties in place.
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }
}
