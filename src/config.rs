//! Configuration management
//!
//! Table construction and logging settings, loaded from a TOML file or
//! string. Every section and field has a default, so an empty document is a
//! valid configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub table: TableConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Transition table construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Reject transitions whose states were minted by another automaton
    #[serde(default = "default_check_ownership")]
    pub check_ownership: bool,

    /// Number of transitions to reserve room for up front
    #[serde(default)]
    pub initial_capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_check_ownership() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            check_ownership: default_check_ownership(),
            initial_capacity: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Filter built from `level`; any `tracing` directive string is accepted
    pub fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| Error::Config(format!("Invalid log level {:?}: {}", self.level, e)))
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        tracing::info!("Loading config from {:?}", path);
        Self::from_toml_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }
}
