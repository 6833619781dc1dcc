//! Configuration loading
//!
//! Resolution priority order:
//! 1. Explicit path (command-line argument, highest priority)
//! 2. `ROSTER_CONFIG` environment variable
//! 3. `~/.config/bhajan-roster/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! Every field is optional in the TOML file; missing fields take the
//! compiled default, so a partial config file is valid.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file path
pub const CONFIG_ENV_VAR: &str = "ROSTER_CONFIG";

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file path
    pub database_path: PathBuf,
    /// HTTP bind port
    pub port: u16,
    /// Catalog search cache time-to-live, seconds
    pub search_cache_ttl_secs: u64,
    /// Maximum number of catalog search hits returned
    pub search_result_cap: usize,
    /// Shared secret gating mutation endpoints; empty disables the gate
    pub edit_secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            port: 5780,
            search_cache_ttl_secs: 300,
            search_result_cap: 25,
            edit_secret: String::new(),
        }
    }
}

impl Config {
    /// Load configuration following the priority order above.
    pub fn load(cli_path: Option<&Path>) -> Result<Config> {
        if let Some(path) = cli_path {
            info!("Loading config from command line: {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path);
            return Self::from_file(Path::new(&path));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                info!("Loading config file: {}", path.display());
                return Self::from_file(&path);
            }
        }

        debug!("No config file found, using compiled defaults");
        Ok(Config::default())
    }

    /// Parse a TOML config file; missing keys take defaults.
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Cannot parse {}: {}", path.display(), e)))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bhajan-roster").join("config.toml"))
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bhajan-roster")
        .join("roster.db")
}
