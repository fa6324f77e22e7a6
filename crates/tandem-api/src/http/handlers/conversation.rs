//! Conversation and message history handlers.
//!
//! Endpoints:
//! - GET /api/v1/users/{id}/conversations    - Conversations a user participates in
//! - GET /api/v1/conversations/{id}/messages - Message history, timestamp ascending

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use tandem_types::conversation::{Conversation, Message};
use tandem_types::{ConversationId, UserId};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/{id}/conversations - List conversations for a user.
pub async fn list_conversations(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let conversations = state.conversations.list_conversations(user_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(conversations, request_id, elapsed)))
}

/// GET /api/v1/conversations/{id}/messages - List messages in a conversation.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if state
        .conversations
        .get_conversation(conversation_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "conversation {conversation_id} not found"
        )));
    }

    let messages = state.conversations.list_messages(conversation_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(messages, request_id, elapsed)))
}
