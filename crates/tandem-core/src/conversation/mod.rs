//! Conversation persistence trait and service.

pub mod repository;
pub mod service;

pub use repository::ConversationRepository;
pub use service::ConversationService;
