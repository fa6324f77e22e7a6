//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `tandem-core` using sqlx with the split
//! read/write pool: raw queries, a private Row struct for SQLite-to-domain
//! mapping, writes on the writer pool, reads on the reader pool.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::Row;

use tandem_core::user::repository::UserRepository;
use tandem_types::UserId;
use tandem_types::error::RepositoryError;
use tandem_types::user::User;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

pub(crate) fn parse_datetime(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid timestamp '{value}': {e}")))
}

/// Fixed-width RFC 3339 with microseconds, so lexicographic order in SQLite
/// matches chronological order.
pub(crate) fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepositoryError> {
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(format_datetime(created_at))
        .execute(&self.pool.writer)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(RepositoryError::Conflict(format!(
                    "username '{username}' already exists"
                )));
            }
            Err(e) => return Err(RepositoryError::Query(e.to_string())),
        };

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, password_hash, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| UserRow::from_row(&r).map_err(|e| RepositoryError::Query(e.to_string())))
            .transpose()?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| UserRow::from_row(&r).map_err(|e| RepositoryError::Query(e.to_string())))
            .transpose()?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn search_by_username(&self, fragment: &str) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users \
             WHERE username LIKE '%' || ? || '%' ORDER BY username",
        )
        .bind(fragment)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|r| {
                UserRow::from_row(r)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_user()
            })
            .collect()
    }
}
