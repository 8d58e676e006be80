//! SQLite history store.
//!
//! Implements `HistoryStore` from `spur-core` using sqlx with the split
//! reader/writer pool: raw queries, private Row structs, and RFC 3339 text
//! timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use spur_core::history::repository::HistoryStore;
use spur_types::chat::{Conversation, Message, NewMessage, Sender, new_message_id};
use spur_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryStore`.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: DatabasePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Delete a conversation and, through the cascade, all its messages.
    pub async fn delete_conversation(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    pub async fn count_conversations(&self) -> Result<i64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(row.0)
    }
}

// ---------------------------------------------------------------------------
// Private Row types
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: self.id,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct MessageRow {
    id: String,
    conversation_id: String,
    sender: String,
    text: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender,
            text: self.text,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed width so that text ordering in SQL equals time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// HistoryStore implementation
// ---------------------------------------------------------------------------

impl HistoryStore for SqliteHistoryStore {
    async fn create_conversation(&self, id: &str) -> Result<Conversation, RepositoryError> {
        let now = Utc::now();
        let stamp = format_datetime(&now);

        sqlx::query("INSERT INTO conversations (id, created_at, updated_at) VALUES (?, ?, ?)")
            .bind(id)
            .bind(&stamp)
            .bind(&stamp)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::Conflict(format!("conversation {id} already exists"))
                }
                other => RepositoryError::Query(other.to_string()),
            })?;

        // Re-parse so the returned value has the stored precision.
        let stored = parse_datetime(&stamp)?;
        Ok(Conversation {
            id: id.to_string(),
            created_at: stored,
            updated_at: stored,
        })
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT id, created_at, updated_at FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn update_conversation(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn create_message(&self, message: &NewMessage) -> Result<String, RepositoryError> {
        let id = new_message_id();

        sqlx::query(
            r#"INSERT INTO messages (id, conversation_id, sender, text, timestamp)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&message.conversation_id)
        .bind(message.sender.to_string())
        .bind(&message.text)
        .bind(format_datetime(&message.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(id)
    }

    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, conversation_id, sender, text, timestamp
               FROM messages
               WHERE conversation_id = ?
               ORDER BY timestamp ASC, id ASC"#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }
}
