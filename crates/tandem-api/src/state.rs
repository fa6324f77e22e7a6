//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the HTTP and
//! WebSocket handlers. Services are generic over repository/hasher/token
//! traits, but AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use tandem_core::conversation::ConversationService;
use tandem_core::registry::ConnectionRegistry;
use tandem_core::relay::RelayEngine;
use tandem_core::service::account::AccountService;
use tandem_infra::auth::{Argon2PasswordHasher, JwtTokenService};
use tandem_infra::resolve_data_dir;
use tandem_infra::sqlite::pool::DatabasePool;
use tandem_infra::sqlite::{SqliteConversationRepository, SqliteUserRepository};
use tandem_types::config::ServerConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAccountService =
    AccountService<SqliteUserRepository, Argon2PasswordHasher, Arc<JwtTokenService>>;

pub type ConcreteConversationService = ConversationService<SqliteConversationRepository>;

pub type ConcreteRelayEngine = RelayEngine<SqliteConversationRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<ConcreteAccountService>,
    pub conversations: Arc<ConcreteConversationService>,
    pub relay: Arc<ConcreteRelayEngine>,
    pub registry: Arc<ConnectionRegistry>,
    pub tokens: Arc<JwtTokenService>,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(config: &ServerConfig) -> anyhow::Result<Self> {
        Self::init_at(config, resolve_data_dir()).await
    }

    /// Initialize against an explicit data directory. Tests use this with a
    /// temporary directory so each test gets an isolated database.
    pub async fn init_at(config: &ServerConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database. The pool stays alive through the repository
        // clones below.
        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("tandem.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        // One token service shared by login (issue) and the relay (verify).
        let tokens = Arc::new(JwtTokenService::new(
            &config.token_secret,
            config.token_ttl_minutes,
        ));

        let accounts = AccountService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            Arc::clone(&tokens),
        );

        let conversations = Arc::new(ConversationService::new(SqliteConversationRepository::new(
            db_pool.clone(),
        )));

        // The registry is constructed here and injected everywhere, never a
        // process global; tests build their own isolated instances.
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = Arc::new(RelayEngine::new(
            Arc::clone(&conversations),
            Arc::clone(&registry),
        ));

        Ok(Self {
            accounts: Arc::new(accounts),
            conversations,
            relay,
            registry,
            tokens,
        })
    }
}
