//! Layered configuration for the issue board server.
//!
//! Settings resolve in order (later wins):
//! built-in defaults → `tracker.toml` → environment → CLI flags.
//! Environment and CLI share one layer because `clap` reads both into the
//! same argument.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! cors = true
//!
//! [store]
//! data_file = "var/issues.json"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::board::server::ServerConfig;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tracker.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    pub data_file: Option<PathBuf>,
}

/// Contents of `tracker.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub store: StoreSection,
}

impl TrackerToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse tracker.toml")
    }

    /// Load an explicitly named file, or `tracker.toml` in `dir` when it exists.
    /// An explicit path that does not exist is an error.
    pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let config_path = dir.join(DEFAULT_CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Values supplied through environment variables or CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_file: Option<PathBuf>,
    pub cors: Option<bool>,
}

/// Merge the layers into the final server configuration.
pub fn resolve(file: &TrackerToml, overrides: Overrides) -> ServerConfig {
    let defaults = ServerConfig::default();
    ServerConfig {
        host: overrides
            .host
            .or_else(|| file.server.host.clone())
            .unwrap_or(defaults.host),
        port: overrides.port.or(file.server.port).unwrap_or(defaults.port),
        data_file: overrides
            .data_file
            .or_else(|| file.store.data_file.clone())
            .unwrap_or(defaults.data_file),
        cors: overrides.cors.or(file.server.cors).unwrap_or(defaults.cors),
    }
}
