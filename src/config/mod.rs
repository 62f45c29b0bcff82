//! Endpoint and credential resolution.
//!
//! Priority: CLI flag (clap also fills flags from `PARAMSYNC_ENDPOINT` /
//! `PARAMSYNC_API_KEY`) → user config file `~/.paramsync/config.json`.
//! Missing credentials abort the run before any row is read.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Resolved connection settings for the catalog API.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_key: String,
}

/// On-disk shape of `~/.paramsync/config.json`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    endpoint: Option<String>,
    api_key: Option<String>,
}

/// Location of the user config file, if a home directory exists.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".paramsync").join("config.json"))
}

fn load_file() -> Result<ConfigFile> {
    let Some(path) = config_path() else {
        return Ok(ConfigFile::default());
    };
    if !path.is_file() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))
}

/// Resolve endpoint and API key from flags and the config file.
///
/// The file is only read when a flag (or its environment variable) left a
/// value unresolved.
///
/// # Errors
///
/// [`Error::MissingEndpoint`] / [`Error::MissingApiKey`] when a value cannot
/// be resolved anywhere, or [`Error::Config`] when the config file exists
/// but cannot be parsed.
pub fn resolve(endpoint: Option<String>, api_key: Option<String>) -> Result<Config> {
    let (endpoint, api_key) = match (endpoint, api_key) {
        (Some(endpoint), Some(api_key)) => (endpoint, api_key),
        (endpoint, api_key) => {
            let file = load_file()?;
            (
                endpoint.or(file.endpoint).ok_or(Error::MissingEndpoint)?,
                api_key.or(file.api_key).ok_or(Error::MissingApiKey)?,
            )
        }
    };
    Ok(Config { endpoint, api_key })
}
