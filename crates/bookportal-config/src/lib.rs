//! Configuration for the Bookportal client.
//!
//! Values come from, in increasing priority:
//! - built-in defaults
//! - a TOML file (`bookportal.toml` or an explicit path)
//! - `BOOKPORTAL__SECTION__KEY` environment variables
//!
//! ```toml
//! [api]
//! base_url = "https://books.example.com/api"
//! timeout = "30s"
//!
//! [cache]
//! list_stale_time = "5m"
//! stats_stale_time = "10m"
//! ```

use std::path::PathBuf;

pub mod loader;
pub mod settings;

pub use loader::{DEFAULT_CONFIG_FILE, ENV_PREFIX, load_config, load_from_str};
pub use settings::{
    ApiConfig, CacheConfig, ClientConfig, LoggingConfig, RoutesConfig, SessionConfig,
};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
