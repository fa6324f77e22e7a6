//! Account HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/register     - Create an account
//! - POST /api/v1/login        - Exchange credentials for a session token
//! - GET  /api/v1/users/{id}   - Look up a user's public profile
//! - GET  /api/v1/users/search - Search accounts by username fragment

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use tandem_types::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tandem_types::user::UserProfile;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for both register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Query parameters for user search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// POST /api/v1/register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let profile = state
        .accounts
        .register(&payload.username, &payload.password)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(profile, request_id, elapsed)))
}

/// POST /api/v1/login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let outcome = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        LoginResponse {
            access_token: outcome.token,
            user: outcome.user,
        },
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/users/{id} - Look up a user's public profile.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let profile = state
        .accounts
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(profile, request_id, elapsed)))
}

/// GET /api/v1/users/search?q= - Search accounts by username fragment.
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let profiles = state.accounts.search_users(&query.q).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(profiles, request_id, elapsed)))
}
