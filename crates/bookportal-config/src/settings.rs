use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        // API validations
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::validation(format!("api.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(
                "api.base_url must use http or https",
            ));
        }
        if self.api.timeout.is_zero() {
            return Err(ConfigError::validation("api.timeout must be > 0"));
        }
        // Cache validations
        if self.cache.list_stale_time.is_zero() || self.cache.stats_stale_time.is_zero() {
            return Err(ConfigError::validation("cache stale times must be > 0"));
        }
        if self.cache.stats_stale_time < self.cache.list_stale_time {
            return Err(ConfigError::validation(
                "cache.stats_stale_time must be >= cache.list_stale_time",
            ));
        }
        // Route validations
        for (name, path) in self.routes.named_paths() {
            if !path.starts_with('/') {
                return Err(ConfigError::validation(format!(
                    "routes.{name} must start with '/'"
                )));
            }
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport timeout for every request.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:3001".into()
}
fn default_timeout() -> Duration {
    Duration::from_secs(30)
}
fn default_user_agent() -> String {
    concat!("bookportal/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Staleness windows of the query cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Lifetime of list and detail reads.
    #[serde(default = "default_list_stale_time", with = "humantime_serde")]
    pub list_stale_time: Duration,
    /// Lifetime of aggregate statistics reads.
    #[serde(default = "default_stats_stale_time", with = "humantime_serde")]
    pub stats_stale_time: Duration,
    /// Entries not read for this long are dropped by `cleanup_expired`.
    #[serde(default = "default_gc_time", with = "humantime_serde")]
    pub gc_time: Duration,
}

fn default_list_stale_time() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_stats_stale_time() -> Duration {
    Duration::from_secs(10 * 60)
}
fn default_gc_time() -> Duration {
    Duration::from_secs(30 * 60)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_stale_time: default_list_stale_time(),
            stats_stale_time: default_stats_stale_time(),
            gc_time: default_gc_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionConfig {
    /// Overrides the location of the persisted session file.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Entry points used by the route guard and the 401 redirect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutesConfig {
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default = "default_register")]
    pub register: String,
    #[serde(default = "default_admin_home")]
    pub admin_home: String,
    #[serde(default = "default_user_home")]
    pub user_home: String,
    /// Every path under this prefix requires the admin role.
    #[serde(default = "default_admin_prefix")]
    pub admin_prefix: String,
}

fn default_login() -> String {
    "/login".into()
}
fn default_register() -> String {
    "/register".into()
}
fn default_admin_home() -> String {
    "/admin/dashboard".into()
}
fn default_user_home() -> String {
    "/books".into()
}
fn default_admin_prefix() -> String {
    "/admin".into()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            register: default_register(),
            admin_home: default_admin_home(),
            user_home: default_user_home(),
            admin_prefix: default_admin_prefix(),
        }
    }
}

impl RoutesConfig {
    fn named_paths(&self) -> [(&'static str, &str); 5] {
        [
            ("login", &self.login),
            ("register", &self.register),
            ("admin_home", &self.admin_home),
            ("user_home", &self.user_home),
            ("admin_prefix", &self.admin_prefix),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = ClientConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cache.list_stale_time, Duration::from_secs(300));
        assert_eq!(cfg.cache.stats_stale_time, Duration::from_secs(600));
        assert_eq!(cfg.routes.user_home, "/books");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut cfg = ClientConfig::default();
        cfg.api.base_url = "ftp://books.example.com".into();
        assert!(cfg.validate().is_err());
        cfg.api.base_url = "not a url".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_stale_windows() {
        let mut cfg = ClientConfig::default();
        cfg.cache.stats_stale_time = Duration::from_secs(60);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("stats_stale_time"));
    }

    #[test]
    fn test_rejects_relative_route() {
        let mut cfg = ClientConfig::default();
        cfg.routes.login = "login".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut cfg = ClientConfig::default();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_humantime_round_trip_from_toml() {
        let cfg: ClientConfig = toml::from_str(
            r#"
            [cache]
            list_stale_time = "2m"
            stats_stale_time = "15m"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cache.list_stale_time, Duration::from_secs(120));
        assert_eq!(cfg.cache.stats_stale_time, Duration::from_secs(900));
        assert_eq!(cfg.api, ApiConfig::default());
    }
}
