//! SQLite connection management for scopestore.
//!
//! Opens the property database described by a [`DbConfig`], creating the
//! parent directory when asked to, and applies the connection settings every
//! store relies on (busy timeout, WAL journal for files, foreign keys).
//! Table schemas belong to the stores that own them.

mod config;
mod error;

pub use config::DbConfig;
pub use error::{DbError, DbResult};

use rusqlite::Connection;
use std::time::Duration;
use tracing::{debug, info};

/// Opens a connection according to `config`.
pub fn open_connection(config: &DbConfig) -> DbResult<Connection> {
    config.validate()?;

    let conn = match &config.path {
        Some(path) => {
            if config.create_dirs {
                if let Some(parent) = config.parent_dir() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            info!("Opening property database at {}", path.display());
            let conn = Connection::open(path)?;
            // journal_mode returns the resulting mode as a row
            let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            debug!("journal_mode = {}", mode);
            conn
        }
        None => {
            debug!("Opening in-memory property database");
            Connection::open_in_memory()?
        }
    };

    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Opens a private in-memory connection (for testing).
pub fn open_in_memory() -> DbResult<Connection> {
    open_connection(&DbConfig::in_memory())
}
