//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the screening engine, supporting
//! configuration files and environment variable overrides with validation and
//! type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration file
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust
//! use watchlist_screening::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{Result, ScreeningError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Watchlist source and refresh settings
    pub watchlist: WatchlistConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Watchlist source and refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// Source identifier for scheduled refreshes: an HTTP(S) URL or a local
    /// file path
    pub source: String,
    /// Local fallback document used before the first successful remote fetch
    pub fallback_path: Option<PathBuf>,
    /// Refresh period in seconds
    pub refresh_interval_secs: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ScreeningError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ScreeningError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("WATCHLIST_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("WATCHLIST_PORT") {
            self.server.port = port.parse().map_err(|_| ScreeningError::Config {
                message: "Invalid port number in WATCHLIST_PORT".to_string(),
            })?;
        }
        if let Ok(source) = std::env::var("WATCHLIST_SOURCE") {
            self.watchlist.source = source;
        }
        if let Ok(fallback) = std::env::var("WATCHLIST_FALLBACK") {
            self.watchlist.fallback_path = Some(PathBuf::from(fallback));
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ScreeningError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.watchlist.source.is_empty() {
            return Err(ScreeningError::ValidationFailed {
                field: "watchlist.source".to_string(),
                reason: "Source identifier cannot be empty".to_string(),
            });
        }

        if self.watchlist.refresh_interval_secs == 0 {
            return Err(ScreeningError::ValidationFailed {
                field: "watchlist.refresh_interval_secs".to_string(),
                reason: "Refresh interval must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            watchlist: WatchlistConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            source: "https://data.trade.gov/downloadable_consolidated_screening_list/v1/consolidated.json"
                .to_string(),
            fallback_path: Some(PathBuf::from("data/entries.json")),
            refresh_interval_secs: 3600,
            request_timeout_secs: 30,
        }
    }
}
