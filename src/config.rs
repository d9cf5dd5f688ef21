//! GitHub token discovery
//!
//! Lookup order:
//! 1. `--token` / `GITHUB_READONLY_TOKEN` (handled by clap)
//! 2. `GITHUB_TOKEN`
//! 3. The hub CLI config file `~/.config/hub` (`github.com[0].oauth_token`)
//!
//! An absent token is not an error here; resolution fails later if a
//! reference actually needs it.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable read after `--token` / `GITHUB_READONLY_TOKEN`
pub const FALLBACK_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Host key in the hub config file
const HUB_HOST: &str = "github.com";

/// One host entry of the hub config
#[derive(Debug, Deserialize)]
struct HubHost {
    #[serde(default)]
    oauth_token: String,
}

/// Location of the hub CLI config file
pub fn hub_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("hub"))
}

/// Read the GitHub token stored by the hub CLI
///
/// A missing file is `Ok(None)`; an unreadable or malformed one is an error.
pub fn read_hub_token(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let invalid = |message: String| ConfigError::InvalidHubConfig {
        path: path.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let hosts: HashMap<String, Vec<HubHost>> =
        serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    Ok(hosts
        .get(HUB_HOST)
        .and_then(|entries| entries.first())
        .map(|entry| entry.oauth_token.clone())
        .filter(|token| !token.is_empty()))
}

/// Pick the first non-empty token from the given sources
pub fn select_token(
    cli_token: Option<&str>,
    env_token: Option<&str>,
    hub_path: Option<&Path>,
) -> Result<String, ConfigError> {
    if let Some(token) = cli_token.filter(|t| !t.is_empty()) {
        debug!("using token from --token or GITHUB_READONLY_TOKEN");
        return Ok(token.to_string());
    }

    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        debug!("using token from {}", FALLBACK_TOKEN_ENV);
        return Ok(token.to_string());
    }

    if let Some(path) = hub_path {
        if let Some(token) = read_hub_token(path)? {
            debug!(path = %path.display(), "using token from hub config");
            return Ok(token);
        }
    }

    debug!("no GitHub token found");
    Ok(String::new())
}

/// Discover the token from the CLI value, the environment and the hub config
pub fn discover_token(cli_token: Option<&str>) -> Result<String, ConfigError> {
    let env_token = std::env::var(FALLBACK_TOKEN_ENV).ok();
    let hub_path = hub_config_path();
    select_token(cli_token, env_token.as_deref(), hub_path.as_deref())
}
