//! Wire envelopes exchanged over the live WebSocket connection.
//!
//! Two shapes cross the wire as JSON text frames:
//!
//! - [`InboundEnvelope`]: a chat message from a connected client,
//!   `{"to": <id>, "content": <string>, "conversation_id": <optional id>}`.
//! - [`DeliveryEnvelope`]: a persisted message forwarded to the recipient,
//!   `{"conversation_id": <id>, "sender_id": <id>, "content": <string>,
//!   "timestamp": <string>}`.
//!
//! Frames that fail to parse as [`InboundEnvelope`] are per-message errors:
//! the relay drops them without persisting and keeps the connection open.

use serde::{Deserialize, Serialize};

use crate::conversation::Message;
use crate::{ConversationId, UserId};

/// A chat message received from a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundEnvelope {
    /// Recipient user id.
    pub to: UserId,
    /// Message body, arbitrary text.
    pub content: String,
    /// Existing conversation to append to. When absent, the relay creates a
    /// new conversation for the (sender, recipient) pair.
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
}

/// A persisted message forwarded to the recipient's live connection.
///
/// The timestamp is serialized as an RFC 3339 string, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub timestamp: String,
}

impl From<&Message> for DeliveryEnvelope {
    fn from(message: &Message) -> Self {
        Self {
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_inbound_parses_without_conversation_id() {
        let env: InboundEnvelope = serde_json::from_str(r#"{"to":2,"content":"hi"}"#).unwrap();
        assert_eq!(env.to, 2);
        assert_eq!(env.content, "hi");
        assert_eq!(env.conversation_id, None);
    }

    #[test]
    fn test_inbound_parses_with_conversation_id() {
        let env: InboundEnvelope =
            serde_json::from_str(r#"{"to":2,"content":"hi","conversation_id":9}"#).unwrap();
        assert_eq!(env.conversation_id, Some(9));
    }

    #[test]
    fn test_inbound_rejects_missing_content() {
        let result = serde_json::from_str::<InboundEnvelope>(r#"{"to":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_inbound_rejects_missing_recipient() {
        let result = serde_json::from_str::<InboundEnvelope>(r#"{"content":"hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_delivery_envelope_from_message() {
        let message = Message {
            id: 1,
            conversation_id: 4,
            sender_id: 1,
            content: "hi".to_string(),
            timestamp: Utc::now(),
        };

        let envelope = DeliveryEnvelope::from(&message);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["conversation_id"], 4);
        assert_eq!(json["sender_id"], 1);
        assert_eq!(json["content"], "hi");
        assert!(json["timestamp"].is_string());
    }
}
