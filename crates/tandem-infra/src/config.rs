//! Server configuration loader.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`ServerConfig`]. Falls back to defaults when the file is missing or
//! malformed, so a fresh checkout runs without any setup.

use std::path::Path;

use tandem_types::config::ServerConfig;

/// Load server configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`ServerConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
///
/// The token secret can additionally be overridden with the
/// `TANDEM_TOKEN_SECRET` environment variable, which takes precedence over
/// both the file and the default.
pub async fn load_server_config(data_dir: &Path) -> ServerConfig {
    let config_path = data_dir.join("config.toml");

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<ServerConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                ServerConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            ServerConfig::default()
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            ServerConfig::default()
        }
    };

    if let Ok(secret) = std::env::var("TANDEM_TOKEN_SECRET") {
        config.token_secret = secret;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_server_config(dir.path()).await;
        assert_eq!(config.port, ServerConfig::default().port);
    }

    #[tokio::test]
    async fn test_valid_file_is_loaded() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("config.toml"), "port = 9999")
            .await
            .unwrap();

        let config = load_server_config(dir.path()).await;
        assert_eq!(config.port, 9999);
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("config.toml"), "port = \"not a number")
            .await
            .unwrap();

        let config = load_server_config(dir.path()).await;
        assert_eq!(config.port, ServerConfig::default().port);
    }
}
