//! HistoryStore trait definition.
//!
//! The narrow storage contract used by the conversation manager: create and
//! read conversations, append and list messages. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use spur_types::chat::{Conversation, Message, NewMessage};
use spur_types::error::RepositoryError;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in spur-infra (e.g., `SqliteHistoryStore`).
pub trait HistoryStore: Send + Sync {
    /// Create a conversation with the given identifier.
    fn create_conversation(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by identifier, or `None` if it does not exist.
    fn get_conversation(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Bump the conversation's `updated_at` to now.
    fn update_conversation(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message and return its generated identifier.
    fn create_message(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<String, RepositoryError>> + Send;

    /// Get all messages of a conversation, ordered by timestamp ASC.
    fn get_messages(
        &self,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}
