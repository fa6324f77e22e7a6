//! Conversation and message types.
//!
//! A conversation is a persistent pairing of two users under which messages
//! are grouped. Participants are stored with fixed roles: `user_a` is the
//! user who opened the conversation, `user_b` the counterpart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConversationId, MessageId, UserId};

/// A two-party conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub user_a: UserId,
    pub user_b: UserId,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Whether the given user is one of the two participants.
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// The other participant, if `user_id` is one of the pair.
    pub fn counterpart_of(&self, user_id: UserId) -> Option<UserId> {
        if self.user_a == user_id {
            Some(self.user_b)
        } else if self.user_b == user_id {
            Some(self.user_a)
        } else {
            None
        }
    }
}

/// A single message within a conversation.
///
/// Immutable once created. The timestamp is assigned by the store at
/// persistence time, never supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation {
            id: 1,
            user_a: 10,
            user_b: 20,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_participant() {
        let conv = conversation();
        assert!(conv.has_participant(10));
        assert!(conv.has_participant(20));
        assert!(!conv.has_participant(30));
    }

    #[test]
    fn test_counterpart_of() {
        let conv = conversation();
        assert_eq!(conv.counterpart_of(10), Some(20));
        assert_eq!(conv.counterpart_of(20), Some(10));
        assert_eq!(conv.counterpart_of(30), None);
    }
}
