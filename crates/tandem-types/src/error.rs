use thiserror::Error;

/// Errors from repository operations (used by trait definitions in tandem-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to registration, login, and session tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately a single variant so
    /// callers cannot distinguish the two cases.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username '{0}' already exists")]
    UsernameTaken(String),

    #[error("invalid username or password: {0}")]
    InvalidInput(String),

    #[error("failed to hash password")]
    HashingFailed,

    #[error("failed to issue session token")]
    TokenIssueFailed,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from relaying a single inbound message.
///
/// These are per-message: the connection handler reports them and keeps the
/// receive loop running.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("message persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::UsernameTaken("ada".to_string());
        assert_eq!(err.to_string(), "username 'ada' already exists");
    }

    #[test]
    fn test_relay_error_wraps_repository_error() {
        let err = RelayError::from(RepositoryError::Query("disk I/O error".to_string()));
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Conflict("username".to_string());
        assert_eq!(err.to_string(), "conflict: username");
    }
}
