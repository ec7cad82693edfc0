//! Configuration System
//!
//! Loads the `pos` CLI settings from a TOML file and environment variables.
//! Environment variables win over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_API_BASE;
use crate::cash::DEFAULT_SELLER_PIN;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cash: CashConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Cash desk settings
#[derive(Debug, Clone, Deserialize)]
pub struct CashConfig {
    /// Supervisor PIN sellers type to open or close the drawer
    #[serde(default = "default_seller_pin")]
    pub seller_pin: String,
}

fn default_seller_pin() -> String {
    DEFAULT_SELLER_PIN.to_string()
}

impl Default for CashConfig {
    fn default() -> Self {
        Self {
            seller_pin: default_seller_pin(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Where the login tokens are kept between runs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Defaults to `<data_local_dir>/pos/session.json`
    pub file: Option<PathBuf>,
}

impl SessionConfig {
    pub fn path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(crate::api::FileTokenStore::default_path)
    }
}

impl ClientConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Defaults plus environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pos").join("config.toml")),
            Some(PathBuf::from("./pos.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `POS_*` overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("POS_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("POS_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.api.timeout_secs = secs;
            }
        }
        if let Some(level) = lookup("POS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("POS_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(file) = lookup("POS_SESSION_FILE") {
            self.session.file = Some(PathBuf::from(file));
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# POS client configuration
#
# Environment variables override these settings:
# - POS_API_URL
# - POS_TIMEOUT_SECS
# - POS_LOG_LEVEL
# - POS_LOG_FORMAT
# - POS_SESSION_FILE

[api]
# Backend base URL, including the /api prefix
base_url = "http://localhost:8000/api"

# Request timeout in seconds
timeout_secs = 15

[cash]
# PIN sellers must type to open or close the cash drawer
seller_pin = "1234"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"

[session]
# Where login tokens are stored
# file = "~/.local/share/pos/session.json"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config = ClientConfig::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.cash.seller_pin, "1234");
        assert!(config.session.file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cash]\nseller_pin = \"9876\"").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.cash.seller_pin, "9876");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.api.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("POS_API_URL", "https://pos.example.cl/api"),
            ("POS_TIMEOUT_SECS", "abc"),
            ("POS_LOG_FORMAT", "json"),
            ("POS_SESSION_FILE", "/tmp/s.json"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://pos.example.cl/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert!(config.logging.is_json());
        assert_eq!(config.session.path(), PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_bad_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = 3").unwrap();

        match ClientConfig::load(file.path()) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
