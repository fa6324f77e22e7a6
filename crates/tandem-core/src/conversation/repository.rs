//! ConversationRepository trait definition.
//!
//! The durable mapping from user pairs to conversations plus the append-only
//! message log. Implementations live in tandem-infra (e.g.,
//! `SqliteConversationRepository`). Uses native async fn in traits (RPITIT,
//! Rust 2024 edition).

use tandem_types::conversation::{Conversation, Message};
use tandem_types::error::RepositoryError;
use tandem_types::{ConversationId, UserId};

/// Repository trait for conversation and message persistence.
pub trait ConversationRepository: Send + Sync {
    /// Create a new conversation with `user_a` as initiator.
    fn create_conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id.
    fn get_conversation(
        &self,
        id: ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Append a message to a conversation.
    ///
    /// Atomic; assigns the message id and a server timestamp that is
    /// non-decreasing within the conversation.
    fn append_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// List conversations the user participates in, either role.
    fn list_conversations(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// List messages in a conversation, ordered by timestamp ascending.
    fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}
