//! UserRepository trait definition.
//!
//! Implementations live in tandem-infra (e.g., `SqliteUserRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use tandem_types::UserId;
use tandem_types::error::RepositoryError;
use tandem_types::user::User;

/// Repository trait for user account persistence.
pub trait UserRepository: Send + Sync {
    /// Create a user. Returns `RepositoryError::Conflict` when the username
    /// is already taken.
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by id.
    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by exact username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Find users whose username contains the given fragment.
    fn search_by_username(
        &self,
        fragment: &str,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;
}
