//! User account persistence trait.

pub mod repository;

pub use repository::UserRepository;
