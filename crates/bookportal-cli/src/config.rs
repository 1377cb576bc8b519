use std::path::Path;

use anyhow::{Context, Result};
use bookportal_auth::FileSessionStorage;
use bookportal_config::{ClientConfig, load_config};

/// Effective configuration: file and environment, then command-line overrides.
pub fn resolve(path: Option<&Path>, server: Option<&str>) -> Result<ClientConfig> {
    let mut config = load_config(path).context("Failed to load configuration")?;
    if let Some(server) = server {
        config.api.base_url = server.trim_end_matches('/').to_string();
        config
            .validate()
            .with_context(|| format!("Invalid server URL: {server}"))?;
    }
    Ok(config)
}

/// Where the session for `profile` is persisted. `session.path` wins over the
/// per-profile file in the home directory.
pub fn session_storage(config: &ClientConfig, profile: &str) -> Result<FileSessionStorage> {
    match &config.session.path {
        Some(path) => Ok(FileSessionStorage::new(path.clone())),
        None => FileSessionStorage::for_profile(profile)
            .context("Cannot determine where to store the session"),
    }
}
