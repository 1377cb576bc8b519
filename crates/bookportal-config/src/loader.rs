use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;

use crate::settings::ClientConfig;
use crate::{ConfigError, Result};

/// Default file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bookportal.toml";

/// Prefix of environment overrides, e.g. `BOOKPORTAL__API__BASE_URL`.
pub const ENV_PREFIX: &str = "BOOKPORTAL";

/// Load configuration from an optional TOML file and the environment.
///
/// An explicit `path` must exist. Without one, `bookportal.toml` in the
/// working directory is used when present. Environment variables override file
/// values and the result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.to_path_buf()));
            }
            debug!(path = %p.display(), "loading configuration file");
            builder = builder.add_source(File::from(p.to_path_buf()).format(FileFormat::Toml));
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                debug!(path = %default_path.display(), "loading default configuration file");
                builder = builder.add_source(File::from(default_path).format(FileFormat::Toml));
            }
        }
    }
    builder = builder.add_source(env_source());
    let cfg = builder
        .build()
        .map_err(|e| ConfigError::parse(format!("config build error: {e}")))?;
    let merged: ClientConfig = cfg
        .try_deserialize()
        .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
    merged.validate()?;
    Ok(merged)
}

/// Parse configuration from a TOML string, applying the same validation.
pub fn load_from_str(content: &str) -> Result<ClientConfig> {
    let cfg = Config::builder()
        .add_source(File::from_str(content, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::parse(format!("config build error: {e}")))?;
    let parsed: ClientConfig = cfg
        .try_deserialize()
        .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
    parsed.validate()?;
    Ok(parsed)
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}
