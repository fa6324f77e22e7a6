//! HTTP and WebSocket request handlers.

pub mod account;
pub mod conversation;
pub mod ws;
