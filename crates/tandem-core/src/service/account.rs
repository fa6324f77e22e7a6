//! Account service: registration, login, and user search.
//!
//! Generic over `UserRepository`, `PasswordHasher`, and `TokenIssuer` so the
//! concrete implementations (SQLite, Argon2, JWT) stay in tandem-infra.

use tracing::info;

use tandem_types::UserId;
use tandem_types::error::{AuthError, RepositoryError};
use tandem_types::user::UserProfile;

use crate::identity::TokenIssuer;
use crate::user::repository::UserRepository;

/// Hashes and verifies login passwords.
///
/// Verification failure carries no detail: a wrong password and a corrupt
/// stored hash both come back `false`.
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    fn verify_password(&self, password: &str, password_hash: &str) -> bool;
}

/// Successful login: a session token plus the account's public profile.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserProfile,
}

/// Orchestrates account registration, login, and lookup.
pub struct AccountService<U: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    users: U,
    hasher: H,
    tokens: T,
}

impl<U: UserRepository, H: PasswordHasher, T: TokenIssuer> AccountService<U, H, T> {
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Usernames are trimmed; blank usernames or passwords are rejected
    /// before touching the store.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username must not be blank".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be blank".to_string()));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = match self.users.create_user(username, &password_hash).await {
            Ok(user) => user,
            Err(RepositoryError::Conflict(_)) => {
                return Err(AuthError::UsernameTaken(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = user.id, %username, "Account registered");
        Ok(user.profile())
    }

    /// Log in with username and password, yielding a session token.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = user.id, "Login succeeded");
        Ok(LoginOutcome {
            token,
            user: user.profile(),
        })
    }

    /// Look up a user's public profile.
    pub async fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.users.find_by_id(id).await?.map(|u| u.profile()))
    }

    /// Search accounts by username fragment.
    pub async fn search_users(&self, fragment: &str) -> Result<Vec<UserProfile>, RepositoryError> {
        let users = self.users.search_by_username(fragment).await?;
        Ok(users.iter().map(|u| u.profile()).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::Utc;

    use tandem_types::user::User;

    use super::*;

    #[derive(Default)]
    struct MemoryUserRepository {
        next_id: AtomicI64,
        users: Mutex<Vec<User>>,
    }

    impl UserRepository for MemoryUserRepository {
        async fn create_user(
            &self,
            username: &str,
            password_hash: &str,
        ) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == username) {
                return Err(RepositoryError::Conflict("username".to_string()));
            }
            let user = User {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn search_by_username(&self, fragment: &str) -> Result<Vec<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.username.contains(fragment))
                .cloned()
                .collect())
        }
    }

    /// Reversible stand-in so tests can assert without real hashing cost.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash_password(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify_password(&self, password: &str, password_hash: &str) -> bool {
            password_hash == format!("hashed:{password}")
        }
    }

    struct StaticIssuer;

    impl TokenIssuer for StaticIssuer {
        fn issue(&self, user_id: i64) -> Result<String, AuthError> {
            Ok(format!("token-for-{user_id}"))
        }
    }

    fn service() -> AccountService<MemoryUserRepository, PlainHasher, StaticIssuer> {
        AccountService::new(MemoryUserRepository::default(), PlainHasher, StaticIssuer)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        let profile = svc.register("ada", "correct horse").await.unwrap();
        assert_eq!(profile.username, "ada");

        let outcome = svc.login("ada", "correct horse").await.unwrap();
        assert_eq!(outcome.user.id, profile.id);
        assert_eq!(outcome.token, format!("token-for-{}", profile.id));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let svc = service();
        svc.register("ada", "pw").await.unwrap();

        let err = svc.register("ada", "other").await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_input() {
        let svc = service();
        assert!(matches!(
            svc.register("   ", "pw").await.unwrap_err(),
            AuthError::InvalidInput(_)
        ));
        assert!(matches!(
            svc.register("ada", "").await.unwrap_err(),
            AuthError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_look_alike() {
        let svc = service();
        svc.register("ada", "pw").await.unwrap();

        let wrong_password = svc.login("ada", "nope").await.unwrap_err();
        let unknown_user = svc.login("grace", "pw").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_get_profile() {
        let svc = service();
        let registered = svc.register("ada", "pw").await.unwrap();

        let profile = svc.get_profile(registered.id).await.unwrap().unwrap();
        assert_eq!(profile, registered);
        assert!(svc.get_profile(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_users_returns_profiles() {
        let svc = service();
        svc.register("ada", "pw").await.unwrap();
        svc.register("adam", "pw").await.unwrap();
        svc.register("grace", "pw").await.unwrap();

        let hits = svc.search_users("ada").await.unwrap();
        let names: Vec<&str> = hits.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["ada", "adam"]);
    }
}
