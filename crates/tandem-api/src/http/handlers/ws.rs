//! WebSocket handler: the live connection lifecycle around the relay engine.
//!
//! The `/ws/{token}` endpoint upgrades an HTTP connection to a WebSocket.
//! The session then walks Connecting -> Authenticated -> Relaying -> Closed:
//!
//! - **Connecting:** the token from the path is verified before anything
//!   else. An invalid, expired, or forged token closes the socket with the
//!   policy-violation code (1008) without registering any state.
//! - **Relaying:** the handler registers the user's live binding and runs a
//!   `tokio::select!` loop multiplexing deliveries addressed to this user
//!   (from the registry's mpsc channel) with inbound frames from the client.
//!   Each inbound text frame is parsed and handed to the relay engine;
//!   malformed frames and persistence failures are per-message errors that
//!   are logged and dropped without closing the connection.
//! - **Closed:** every loop exit -- close frame, transport error, stream
//!   end, replaced binding -- falls through to a single cleanup point that
//!   conditionally unregisters the binding, so a slow teardown can never
//!   evict the binding of a newer connection by the same user.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use tandem_core::identity::TokenVerifier;
use tandem_core::registry::ConnectionHandle;
use tandem_types::UserId;
use tandem_types::envelope::InboundEnvelope;

use crate::state::AppState;

/// Upgrade an HTTP request to a WebSocket relay session.
///
/// This is mounted at `/ws/{token}` in the router. The token travels in the
/// path because the session is established before any frame is exchanged.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state, token))
}

/// Core WebSocket session handler.
async fn handle_connection(mut socket: WebSocket, state: AppState, token: String) {
    let Some(user_id) = state.tokens.verify(&token) else {
        tracing::debug!("Rejecting WebSocket connection with invalid token");
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: "invalid or expired token".into(),
            })))
            .await;
        return;
    };

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Bind the user to this connection. Deliveries addressed to the user are
    // queued on the channel and drained by the select loop below.
    let (tx, mut deliveries) = mpsc::unbounded_channel();
    let connection_id = Uuid::now_v7();
    state
        .registry
        .register(user_id, ConnectionHandle::new(connection_id, tx));
    tracing::info!(%user_id, %connection_id, "Relay session started");

    loop {
        tokio::select! {
            // --- Branch 1: forward deliveries to this client ---
            delivery = deliveries.recv() => {
                match delivery {
                    Some(envelope) => {
                        match serde_json::to_string(&envelope) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                    // Client disconnected
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!(%user_id, "Failed to serialize delivery envelope: {err}");
                            }
                        }
                    }
                    None => {
                        // The registry dropped this connection's sender: the
                        // user reconnected and the binding was replaced.
                        tracing::debug!(%user_id, %connection_id, "Binding replaced by newer connection");
                        break;
                    }
                }
            }

            // --- Branch 2: relay inbound frames from this client ---
            frame = ws_receiver.next() => {
                if let SessionControl::Close = handle_frame(&state, user_id, frame).await {
                    break;
                }
            }
        }
    }

    // Single cleanup point for every exit path above. Conditional on the
    // connection id, so this runs exactly once per session and a stale
    // teardown never unbinds a newer connection.
    state.registry.unregister(user_id, connection_id);
    tracing::info!(%user_id, %connection_id, "Relay session closed");
}

/// What the session loop should do after one inbound frame.
enum SessionControl {
    Continue,
    Close,
}

/// Handle one inbound frame from the client.
///
/// Only a close frame, a transport error, or stream end terminates the
/// session. Everything a client can put inside a text frame, including
/// garbage, is a per-message concern handled by [`process_envelope`].
async fn handle_frame(
    state: &AppState,
    user_id: UserId,
    frame: Option<Result<Message, axum::Error>>,
) -> SessionControl {
    match frame {
        Some(Ok(Message::Text(text))) => {
            process_envelope(state, user_id, &text).await;
            SessionControl::Continue
        }
        Some(Ok(Message::Close(_))) | None => {
            // Client disconnected
            SessionControl::Close
        }
        Some(Err(err)) => {
            tracing::debug!(%user_id, "WebSocket receive error: {err}");
            SessionControl::Close
        }
        // Ignore binary, ping, pong protocol frames (handled by axum/tungstenite)
        Some(Ok(_)) => SessionControl::Continue,
    }
}

/// Parse and relay a single inbound frame.
///
/// Both failure modes here are per-message by design: a malformed envelope
/// or a failed persistence write must not terminate the session.
async fn process_envelope(state: &AppState, sender_id: UserId, text: &str) {
    let envelope: InboundEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(%sender_id, error = %err, "Ignoring malformed envelope");
            return;
        }
    };

    let recipient = envelope.to;
    match state.relay.relay(sender_id, envelope).await {
        Ok(receipt) => {
            tracing::debug!(
                %sender_id,
                recipient,
                conversation_id = receipt.message.conversation_id,
                delivery = ?receipt.delivery,
                "Envelope relayed"
            );
        }
        Err(err) => {
            tracing::warn!(%sender_id, recipient, error = %err, "Message dropped: {err}");
        }
    }
}
