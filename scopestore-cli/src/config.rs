//! Host configuration file.

use anyhow::{Context, Result};
use scopestore_db::DbConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of the TOML config file. Every table is optional.
///
/// ```toml
/// [database]
/// path = "/var/lib/scopestore/properties.db"
/// busy_timeout_ms = 5000
///
/// [log]
/// filter = "info,scopestore_storage=debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub database: DbConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing-subscriber` `EnvFilter` directive.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl CliConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Applies command-line overrides. `memory` wins over `db`.
    pub fn apply_overrides(&mut self, db: Option<PathBuf>, memory: bool) {
        if let Some(path) = db {
            self.database.path = Some(path);
        }
        if memory {
            self.database.path = None;
        }
    }
}
