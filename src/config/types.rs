//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use super::limits::LimitsConfig;
use super::validation;

/// Port clients connect to unless configured otherwise.
const DEFAULT_PORT: u16 = 8888;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Per-connection limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validation::validate(&config).map_err(|errors| {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            ConfigError::Invalid(joined)
        })?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, used in logs.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:8888").
    #[serde(default = "default_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_server_name() -> String {
    "chatd".to_string()
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.name, "chatd");
        assert_eq!(config.listen.address.port(), 8888);
        assert_eq!(config.limits.max_line_len, 4096);
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
[server]
name = "test.chat"

[listen]
address = "127.0.0.1:9999"

[limits]
max_username_len = 16
"#,
        )
        .unwrap();
        assert_eq!(config.server.name, "test.chat");
        assert_eq!(config.listen.address, "127.0.0.1:9999".parse().unwrap());
        assert_eq!(config.limits.max_username_len, 16);
        assert_eq!(config.limits.outbound_queue, 64);
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(
            Config::parse("[listen\naddress = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::parse("[listen]\naddress = \"not an address\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_limits_are_invalid() {
        let err = Config::parse("[limits]\noutbound_queue = 0\nsend_timeout_ms = 0").unwrap_err();
        match err {
            ConfigError::Invalid(msg) => {
                assert!(msg.contains("outbound_queue"));
                assert!(msg.contains("send_timeout_ms"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nname = \"from-disk\"\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().server.name, "from-disk");
    }
}
