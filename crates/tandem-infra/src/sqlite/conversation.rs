//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `tandem-core`. Message appends
//! run in a transaction on the single-connection writer pool, which both
//! makes the append atomic and serializes concurrent appenders.

use chrono::{SubsecRound, Utc};
use sqlx::Row;

use tandem_core::conversation::repository::ConversationRepository;
use tandem_types::conversation::{Conversation, Message};
use tandem_types::error::RepositoryError;
use tandem_types::{ConversationId, UserId};

use super::pool::DatabasePool;
use super::user::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Conversation.
struct ConversationRow {
    id: i64,
    user_a: i64,
    user_b: i64,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_a: row.try_get("user_a")?,
            user_b: row.try_get("user_b")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: self.id,
            user_a: self.user_a,
            user_b: self.user_b,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: i64,
    conversation_id: i64,
    sender_id: i64,
    content: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            sender_id: row.try_get("sender_id")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            content: self.content,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Conversation, RepositoryError> {
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO conversations (user_a, user_b, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_a)
        .bind(user_b)
        .bind(format_datetime(created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Conversation {
            id: result.last_insert_rowid(),
            user_a,
            user_b,
            created_at,
        })
    }

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, user_a, user_b, created_at FROM conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| ConversationRow::from_row(&r).map_err(|e| RepositoryError::Query(e.to_string())))
            .transpose()?
            .map(ConversationRow::into_conversation)
            .transpose()
    }

    async fn append_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        // The store assigns timestamps, and they must be non-decreasing
        // within a conversation. Two appenders can race between reading the
        // clock and inserting, so clamp against the latest stored timestamp
        // inside the same transaction.
        let mut timestamp = Utc::now().trunc_subsecs(6);
        let latest: (Option<String>,) =
            sqlx::query_as("SELECT MAX(timestamp) FROM messages WHERE conversation_id = ?")
                .bind(conversation_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        if let Some(previous) = latest.0 {
            let previous = parse_datetime(&previous)?;
            if previous > timestamp {
                timestamp = previous;
            }
        }

        let result = sqlx::query(
            "INSERT INTO messages (conversation_id, sender_id, content, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(format_datetime(timestamp))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Message {
            id: result.last_insert_rowid(),
            conversation_id,
            sender_id,
            content: content.to_string(),
            timestamp,
        })
    }

    async fn list_conversations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, user_a, user_b, created_at FROM conversations \
             WHERE user_a = ?1 OR user_b = ?1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|r| {
                ConversationRow::from_row(r)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_conversation()
            })
            .collect()
    }

    async fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, conversation_id, sender_id, content, timestamp FROM messages \
             WHERE conversation_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|r| {
                MessageRow::from_row(r)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()
            })
            .collect()
    }
}
