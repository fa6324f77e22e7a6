//! Infrastructure implementations for Tandem.
//!
//! Concrete backends for the traits defined in `tandem-core`: SQLite
//! repositories over a split read/write pool, HS256 JWT session tokens, and
//! Argon2 password hashing, plus the config loader and data directory
//! resolution.

pub mod auth;
pub mod config;
pub mod sqlite;

use std::path::PathBuf;

/// Resolve the data directory.
///
/// Priority:
/// 1. `TANDEM_DATA_DIR` environment variable
/// 2. Platform home directory (`~/.tandem`)
/// 3. `./.tandem` as a last resort
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TANDEM_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".tandem");
    }

    PathBuf::from(".tandem")
}
