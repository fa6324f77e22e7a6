//! Shared domain types for Tandem.
//!
//! This crate contains the core domain types used across the Tandem chat
//! backend: User, Conversation, Message, the wire envelopes exchanged over
//! the live connection, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod envelope;
pub mod error;
pub mod user;

/// Stable user identifier, assigned by the store at registration.
pub type UserId = i64;

/// Conversation identifier, assigned by the store on creation.
pub type ConversationId = i64;

/// Message identifier, assigned by the store on append.
pub type MessageId = i64;
