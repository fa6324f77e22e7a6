//! Server configuration types for Tandem.
//!
//! `ServerConfig` represents the top-level `config.toml` that controls the
//! bind address, token signing, and CORS behavior.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Tandem server.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults;
/// the token secret default exists for local development only and should be
/// overridden via `token_secret` or the `TANDEM_TOKEN_SECRET` env var.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host the HTTP/WebSocket listener binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP/WebSocket listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HMAC secret for signing session tokens.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    /// Session token lifetime in minutes.
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_token_secret() -> String {
    "tandem-dev-secret-change-me".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    60 * 24
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token_secret: default_token_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8090);
        assert_eq!(config.token_ttl_minutes, 60 * 24);
    }

    #[test]
    fn test_server_config_deserialize_with_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 8090);
    }

    #[test]
    fn test_server_config_deserialize_with_values() {
        let toml_str = r#"
host = "0.0.0.0"
port = 9000
token_secret = "s3cret"
token_ttl_minutes = 30
"#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.token_secret, "s3cret");
        assert_eq!(config.token_ttl_minutes, 30);
    }
}
