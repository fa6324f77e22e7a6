//! Connection registry: the process-wide map from user id to live connection.
//!
//! The registry is the single piece of mutable shared state in the relay
//! core. It is an injectable component owned by the application state, not a
//! global: construct one at service start and hand an `Arc` to every
//! connection handler (and an isolated instance to every test).
//!
//! Concurrency discipline: the map is a [`DashMap`], so each operation takes
//! a short-lived per-shard lock. No guard is ever held across an await
//! point -- `lookup` clones the outbound channel sender and releases the
//! shard before the caller sends anything.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use tandem_types::UserId;
use tandem_types::envelope::DeliveryEnvelope;

/// Sending half of a connection's outbound delivery channel.
pub type OutboundSender = mpsc::UnboundedSender<DeliveryEnvelope>;

/// A live binding between an authenticated user and their open connection.
///
/// The connection id distinguishes successive connections by the same user,
/// so a stale disconnect cannot evict a newer binding.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    connection_id: Uuid,
    sender: OutboundSender,
}

impl ConnectionHandle {
    pub fn new(connection_id: Uuid, sender: OutboundSender) -> Self {
        Self {
            connection_id,
            sender,
        }
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

/// Map from user id to their one live connection.
///
/// A user has at most one binding; registering again replaces the previous
/// one (last writer wins -- no multi-device support).
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<UserId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a user to a connection, replacing any prior binding.
    pub fn register(&self, user_id: UserId, handle: ConnectionHandle) {
        let connection_id = handle.connection_id;
        if self.connections.insert(user_id, handle).is_some() {
            tracing::debug!(%user_id, %connection_id, "Replaced existing connection binding");
        } else {
            tracing::debug!(%user_id, %connection_id, "Registered connection binding");
        }
    }

    /// Remove the binding for a user, but only if it still belongs to the
    /// given connection.
    ///
    /// A naive remove-by-key is racy: if the user reconnects while the old
    /// handler is still tearing down, the old handler's cleanup would evict
    /// the new connection. Matching on the connection id makes the stale
    /// unregister a no-op. Returns whether a binding was removed.
    pub fn unregister(&self, user_id: UserId, connection_id: Uuid) -> bool {
        let removed = self
            .connections
            .remove_if(&user_id, |_, handle| handle.connection_id == connection_id)
            .is_some();
        if removed {
            tracing::debug!(%user_id, %connection_id, "Unregistered connection binding");
        } else {
            tracing::debug!(%user_id, %connection_id, "Skipped stale unregister");
        }
        removed
    }

    /// Non-blocking lookup of a user's live outbound channel.
    pub fn lookup(&self, user_id: UserId) -> Option<OutboundSender> {
        self.connections
            .get(&user_id)
            .map(|entry| entry.sender.clone())
    }

    /// Number of currently bound users.
    pub fn online_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn handle() -> (ConnectionHandle, mpsc::UnboundedReceiver<DeliveryEnvelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle::new(Uuid::now_v7(), tx), rx)
    }

    #[test]
    fn test_register_then_lookup() {
        let registry = ConnectionRegistry::new();
        let (h, _rx) = handle();
        registry.register(1, h);

        assert!(registry.lookup(1).is_some());
        assert!(registry.lookup(2).is_none());
        assert_eq!(registry.online_count(), 1);
    }

    #[test]
    fn test_last_writer_wins_on_reconnect() {
        let registry = ConnectionRegistry::new();
        let (old, _old_rx) = handle();
        let (new, mut new_rx) = handle();
        registry.register(1, old);
        registry.register(1, new);

        let sender = registry.lookup(1).unwrap();
        sender
            .send(DeliveryEnvelope {
                conversation_id: 1,
                sender_id: 2,
                content: "ping".to_string(),
                timestamp: "t".to_string(),
            })
            .unwrap();

        // Delivery lands on the newer connection's channel.
        assert_eq!(new_rx.try_recv().unwrap().content, "ping");
    }

    #[test]
    fn test_stale_unregister_does_not_evict_newer_binding() {
        let registry = ConnectionRegistry::new();
        let (old, _old_rx) = handle();
        let old_id = old.connection_id();
        let (new, _new_rx) = handle();
        let new_id = new.connection_id();

        // User connects, reconnects before the old handler's cleanup runs.
        registry.register(1, old);
        registry.register(1, new);

        // Old handler's delayed cleanup must be a no-op.
        assert!(!registry.unregister(1, old_id));
        assert!(registry.lookup(1).is_some());

        // The current handler's cleanup still works.
        assert!(registry.unregister(1, new_id));
        assert!(registry.lookup(1).is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_register_unregister_leaves_consistent_state() {
        let registry = Arc::new(ConnectionRegistry::new());

        let mut tasks = Vec::new();
        for user_id in 0..8i64 {
            for _ in 0..16 {
                let registry = Arc::clone(&registry);
                tasks.push(tokio::spawn(async move {
                    let (h, _rx) = handle();
                    let connection_id = h.connection_id();
                    registry.register(user_id, h);
                    // Lookup mid-churn is either absent or a usable sender,
                    // never a torn value.
                    let _ = registry.lookup(user_id);
                    registry.unregister(user_id, connection_id);
                }));
            }
        }
        for task in tasks {
            task.await.unwrap();
        }

        // Every register was paired with an unregister, except those whose
        // binding was replaced first -- in which case the replacement's own
        // unregister removed it. Either way nothing should linger.
        assert_eq!(registry.online_count(), 0);
    }
}
