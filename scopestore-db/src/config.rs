//! Database configuration.

use crate::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
// SQLite takes the busy timeout as a C int.
const MAX_BUSY_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Where and how to open the property database.
///
/// Deserializes from the `[database]` table of a TOML config file. Every
/// field is optional; an absent `path` selects an in-memory database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// Database file. `None` opens a private in-memory database.
    pub path: Option<PathBuf>,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Create missing parent directories of `path`.
    pub create_dirs: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            create_dirs: true,
        }
    }
}

impl DbConfig {
    /// Config for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Config for a database file at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }

    /// Validates the config for constraints serde cannot express.
    pub fn validate(&self) -> DbResult<()> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(DbError::Config("path must not be empty".into()));
            }
            if path.is_dir() {
                return Err(DbError::Config(format!(
                    "path {} is a directory",
                    path.display()
                )));
            }
        }
        if self.busy_timeout_ms == 0 {
            return Err(DbError::Config("busy_timeout_ms must be positive".into()));
        }
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(DbError::Config(format!(
                "busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    pub(crate) fn parent_dir(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
    }
}
