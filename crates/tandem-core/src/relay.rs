//! Relay engine: persist each inbound message once, then forward it to the
//! recipient's live connection if one exists.
//!
//! The engine is transport-agnostic. The WebSocket handler in tandem-api
//! owns the connection lifecycle (accept, authenticate, receive loop,
//! teardown) and calls [`RelayEngine::relay`] for every parsed inbound
//! envelope. Ordering follows from the caller: a connection's receive loop
//! processes one envelope at a time, and the outbound mpsc channel preserves
//! send order, so messages from a single sender are persisted and forwarded
//! in the order received. No ordering holds across senders.
//!
//! Persistence always happens before the forwarding attempt: a message that
//! reaches a recipient live is already durable, and a message whose
//! recipient is offline is durable anyway (the recipient sees it via a later
//! history read -- no retry, no queue).

use std::sync::Arc;

use tracing::debug;

use tandem_types::UserId;
use tandem_types::conversation::Message;
use tandem_types::envelope::{DeliveryEnvelope, InboundEnvelope};
use tandem_types::error::RelayError;

use crate::conversation::repository::ConversationRepository;
use crate::conversation::service::ConversationService;
use crate::registry::ConnectionRegistry;

/// Outcome of the live-forwarding step for one message.
///
/// `RecipientOffline` is not an error: the message is durable either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    RecipientOffline,
}

/// Result of relaying one inbound envelope: the persisted message and
/// whether it also reached the recipient live.
#[derive(Debug)]
pub struct RelayReceipt {
    pub message: Message,
    pub delivery: DeliveryStatus,
}

/// Persists inbound messages and forwards them to live recipients.
pub struct RelayEngine<C: ConversationRepository> {
    conversations: Arc<ConversationService<C>>,
    registry: Arc<ConnectionRegistry>,
}

impl<C: ConversationRepository> RelayEngine<C> {
    pub fn new(
        conversations: Arc<ConversationService<C>>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            conversations,
            registry,
        }
    }

    /// Relay one inbound envelope from an authenticated sender.
    ///
    /// Resolves the conversation (creating one when the client supplied no
    /// id), persists the message, then attempts live delivery. Errors are
    /// per-message: the caller logs them and keeps its receive loop running.
    pub async fn relay(
        &self,
        sender_id: UserId,
        envelope: InboundEnvelope,
    ) -> Result<RelayReceipt, RelayError> {
        let conversation_id = match envelope.conversation_id {
            Some(id) => id,
            None => {
                self.conversations
                    .open_conversation(sender_id, envelope.to)
                    .await?
                    .id
            }
        };

        let message = self
            .conversations
            .append_message(conversation_id, sender_id, &envelope.content)
            .await?;

        let delivery = self.deliver(envelope.to, DeliveryEnvelope::from(&message));
        debug!(
            conversation_id,
            message_id = message.id,
            recipient = envelope.to,
            ?delivery,
            "Message relayed"
        );

        Ok(RelayReceipt { message, delivery })
    }

    /// Forward a delivery envelope to the recipient's live channel, if any.
    ///
    /// A send error means the recipient's handler dropped its receiving half
    /// mid-teardown; that counts as offline, same as no binding at all.
    fn deliver(&self, recipient: UserId, envelope: DeliveryEnvelope) -> DeliveryStatus {
        match self.registry.lookup(recipient) {
            Some(sender) if sender.send(envelope).is_ok() => DeliveryStatus::Delivered,
            _ => DeliveryStatus::RecipientOffline,
        }
    }
}
