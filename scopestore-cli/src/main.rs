//! scopestore command-line host
//!
//! Usage:
//!   scopestore --db properties.db selfcheck
//!   scopestore --memory greeting save --hello "Hi, " --welcome "there"
//!
//! Logging goes to stderr. `RUST_LOG` overrides the configured filter.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use scopestore_cli::{Cli, CliConfig, Session, run};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = CliConfig::load_or_default(cli.config.as_deref())?;
    config.apply_overrides(cli.db.clone(), cli.memory);

    let default_filter = if cli.verbose { "debug" } else { config.log.filter.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    config.database.validate().context("Invalid database configuration")?;
    match &config.database.path {
        Some(path) => info!("Using database {}", path.display()),
        None => info!("Using in-memory database"),
    }
    debug!("Running {:?}", cli.command);

    let session = Session::open(&config.database)?;
    let stdout = io::stdout();
    let ok = run(&session, &cli.command, &mut stdout.lock())?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
