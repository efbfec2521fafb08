//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`TUNESYNC_CONFIG`)
//! 3. User config directory (`<config_dir>/tunesync/config.toml`)
//! 4. Built-in defaults (no file)
//!
//! A missing or unreadable file never aborts startup: a warning is logged and
//! the built-in defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TUNESYNC_CONFIG";

/// Files submitted per scan request, also the largest batch the server accepts
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Base URL of the library server API
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Files per scan request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            batch_size: default_batch_size(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:5730/api".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > DEFAULT_BATCH_SIZE {
            return Err(Error::Config(format!(
                "batch_size must be between 1 and {}",
                DEFAULT_BATCH_SIZE
            )));
        }
        if self.server_url.trim().is_empty() {
            return Err(Error::Config("server_url must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Pick the config file to load, if any
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config directory
    dirs::config_dir()
        .map(|d| d.join("tunesync").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load configuration with graceful degradation
///
/// No path, a missing file or an unreadable file yield the defaults. A file
/// that exists but does not parse is an error, so typos are not silently
/// ignored.
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        info!("No config file found, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Config file not readable, using built-in defaults"
            );
            return Ok(TomlConfig::default());
        }
    };

    let config = TomlConfig::from_toml_str(&content)?;
    info!(path = %path.display(), "Loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            server_url = "http://music.local/api"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.server_url, "http://music.local/api");
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = TomlConfig::from_toml_str("batch_size = 0");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_batch_size_above_cap_rejected() {
        let result = TomlConfig::from_toml_str("batch_size = 50");
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("between 1 and 10")));

        let config = TomlConfig::from_toml_str("batch_size = 10").unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }
}
