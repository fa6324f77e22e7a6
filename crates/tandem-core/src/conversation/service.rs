//! Conversation service wrapping the repository.
//!
//! Generic over `ConversationRepository` to keep the layering clean
//! (tandem-core never depends on tandem-infra).

use tracing::info;

use tandem_types::conversation::{Conversation, Message};
use tandem_types::error::RepositoryError;
use tandem_types::{ConversationId, UserId};

use crate::conversation::repository::ConversationRepository;

/// Orchestrates conversation creation and message persistence.
pub struct ConversationService<C: ConversationRepository> {
    repo: C,
}

impl<C: ConversationRepository> ConversationService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &C {
        &self.repo
    }

    /// Open a new conversation between two users.
    ///
    /// Always creates a fresh row, even when a conversation for the same
    /// pair already exists. Repeated chats between the same two users can
    /// therefore fragment across several conversation ids; clients avoid
    /// this by passing the existing `conversation_id` with each message.
    pub async fn open_conversation(
        &self,
        initiator: UserId,
        counterpart: UserId,
    ) -> Result<Conversation, RepositoryError> {
        let conversation = self.repo.create_conversation(initiator, counterpart).await?;
        info!(
            conversation_id = conversation.id,
            %initiator,
            %counterpart,
            "Conversation opened"
        );
        Ok(conversation)
    }

    /// Append a message; the store assigns id and timestamp.
    pub async fn append_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        self.repo
            .append_message(conversation_id, sender_id, content)
            .await
    }

    /// Get a conversation by id.
    pub async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        self.repo.get_conversation(id).await
    }

    /// List conversations the user participates in.
    pub async fn list_conversations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        self.repo.list_conversations(user_id).await
    }

    /// List messages in a conversation, timestamp ascending.
    pub async fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        self.repo.list_messages(conversation_id).await
    }
}
