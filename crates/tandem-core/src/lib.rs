//! Business logic and repository traits for Tandem.
//!
//! This crate owns everything between the transport layer and the database:
//! the connection registry, the relay engine, the account and conversation
//! services, and the traits their dependencies implement. Concrete
//! implementations (SQLite repositories, JWT tokens, Argon2 hashing) live in
//! `tandem-infra`; this crate never depends on it.

pub mod conversation;
pub mod identity;
pub mod registry;
pub mod relay;
pub mod service;
pub mod user;
