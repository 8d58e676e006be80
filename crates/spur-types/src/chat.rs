//! Conversation and message types for the support chat.
//!
//! A [`Conversation`] owns an ordered sequence of [`Message`]s. Messages
//! alternate between the customer (`user`) and the support agent (`ai`),
//! starting with `user`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

/// Maximum accepted length of a customer message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Number of most recent messages included in a generation prompt.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Who sent a message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'ai'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Label used when rendering this sender into a prompt transcript.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Sender::User => "Customer",
            Sender::Ai => "Support Agent",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A support conversation (one customer session).
///
/// `id` never changes after creation and `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single persisted message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A message that has not been stored yet. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl NewMessage {
    /// Build a message stamped with the current time.
    pub fn now(conversation_id: impl Into<String>, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Result of a completed exchange: the agent's reply and the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
}

/// Generate a new, globally unique conversation identifier.
pub fn new_conversation_id() -> String {
    format!("conv_{}", Uuid::now_v7())
}

/// Generate a new, globally unique message identifier.
pub fn new_message_id() -> String {
    format!("msg_{}", Uuid::now_v7())
}

/// Trim and validate a customer message.
///
/// Returns the trimmed text. Length is counted in characters, not bytes.
pub fn validate_message(raw: &str, max_chars: usize) -> Result<&str, ChatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ChatError::InvalidInput);
    }

    let length = trimmed.chars().count();
    if length > max_chars {
        return Err(ChatError::MessageTooLong {
            length,
            max: max_chars,
        });
    }

    Ok(trimmed)
}
