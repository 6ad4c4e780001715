//! Endpoint resolution from an optional TOML config file.
//!
//! The config directory is taken from `SNAP_DATA`. When the variable or
//! the file is missing the built-in default endpoint is used. Read and
//! parse failures are returned to the caller, which applies its own
//! fallback.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Fallback quote API endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://thesimpsonsquoteapi.glitch.me/quotes";

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "SNAP_DATA";

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Contents of `config.toml`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

/// Resolve the endpoint from `SNAP_DATA`, using `default` if the config
/// file cannot be read or parsed.
pub fn load_endpoint(default: &str) -> String {
    endpoint_or_default(resolve_endpoint(default), default)
}

/// `load_endpoint` for an explicit config directory.
pub fn load_endpoint_in(dir: Option<&Path>, default: &str) -> String {
    endpoint_or_default(resolve_endpoint_in(dir, default), default)
}

fn endpoint_or_default(resolved: Result<String>, default: &str) -> String {
    match resolved {
        Ok(endpoint) => endpoint,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "error loading config");
            warn!(endpoint = default, "using default endpoint");
            default.to_string()
        }
    }
}

/// Resolve the endpoint using the directory named by `SNAP_DATA`.
pub fn resolve_endpoint(default: &str) -> Result<String> {
    let dir = std::env::var_os(CONFIG_DIR_ENV);
    resolve_endpoint_in(dir.as_deref().map(Path::new), default)
}

/// Resolve the endpoint from `<dir>/config.toml`, falling back to `default`
/// when the directory is unset, the file is missing, or the file has no
/// usable `endpoint` key.
pub fn resolve_endpoint_in(dir: Option<&Path>, default: &str) -> Result<String> {
    let dir = match dir {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => {
            info!("{CONFIG_DIR_ENV} environment variable is not set, using default endpoint");
            return Ok(default.to_string());
        }
    };

    let path = dir.join(CONFIG_FILE);

    match fs::metadata(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(dir = %dir.display(), "{CONFIG_FILE} not found, using default endpoint");
            return Ok(default.to_string());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat config file: {}", path.display()));
        }
    }

    let config = AppConfig::load(&path)?;

    match config.endpoint {
        Some(endpoint) if !endpoint.trim().is_empty() => {
            debug!(path = %path.display(), endpoint = %endpoint, "Endpoint loaded from config");
            Ok(endpoint)
        }
        _ => {
            info!(path = %path.display(), "No endpoint set in config, using default endpoint");
            Ok(default.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
