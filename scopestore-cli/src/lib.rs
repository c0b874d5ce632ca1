//! Command-line host for scopestore.
//!
//! Wires configuration, logging and the storage service together and runs
//! the sample behaviours, the self-check suite, scope purges and store
//! statistics.

pub mod config;
pub mod sample;

pub use config::{CliConfig, LogConfig};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sample::GreetingSettings;
use scopestore_db::DbConfig;
use scopestore_storage::{EntryFilter, PropertyEntryStore};
use scopestore_toolkit::{DefaultStorageService, StorageService, selfcheck};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "scopestore")]
#[command(about = "Scoped property storage: self-check, sample settings, stats and purges")]
#[command(version)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Use a private in-memory database
    #[arg(long, global = true, conflicts_with = "db")]
    pub memory: bool,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the storage self-check suite
    Selfcheck,
    /// Run the start-up hook of the sample plugin
    Setup,
    /// Show or change the sample greeting settings
    Greeting {
        #[command(subcommand)]
        action: GreetingCommand,
    },
    /// Count entries and partitions per entity name
    Stats,
    /// List the keys of a constant-name scope
    Keys {
        name: String,
        /// Only keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Delete the data of every context of a scope
    Purge {
        #[command(subcommand)]
        target: PurgeTarget,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GreetingCommand {
    Show,
    Save {
        #[arg(long)]
        admin_only: bool,
        #[arg(long)]
        hello: Option<String>,
        #[arg(long)]
        welcome: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PurgeTarget {
    Project,
    Issue,
    Record,
    Constant { name: String },
    Greeting,
}

/// An open property database and the storage service over it.
#[derive(Clone)]
pub struct Session {
    store: PropertyEntryStore,
    service: DefaultStorageService,
}

impl Session {
    /// Opens the database described by `config` and builds the service on it.
    pub fn open(config: &DbConfig) -> Result<Self> {
        let store =
            PropertyEntryStore::open(config).context("Failed to open property database")?;
        let service = DefaultStorageService::with_store(store.clone())
            .context("Failed to build storage service")?;
        Ok(Self { store, service })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(&DbConfig::in_memory())
    }

    pub fn store(&self) -> &PropertyEntryStore {
        &self.store
    }

    pub fn service(&self) -> &DefaultStorageService {
        &self.service
    }
}

/// Entry statistics of one entity name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityStats {
    pub partitions: usize,
    pub entries: usize,
}

/// Per entity name statistics, ordered by name.
pub fn stats(store: &PropertyEntryStore) -> Result<BTreeMap<String, EntityStats>> {
    let mut stats = BTreeMap::<String, EntityStats>::new();
    for (entity_name, _) in store.partitions(&EntryFilter::all())? {
        stats.entry(entity_name).or_default().partitions += 1;
    }
    for (entity_name, entry) in &mut stats {
        entry.entries = store.count(&EntryFilter::all().with_entity_name(entity_name))?;
    }
    Ok(stats)
}

/// Removes the data of every context of `target`. Returns the number of
/// removed entries.
pub fn purge(service: &DefaultStorageService, target: &PurgeTarget) -> Result<usize> {
    let scopes = service.scopes();
    let removed = match target {
        PurgeTarget::Project => scopes.project().remove_all()?,
        PurgeTarget::Issue => scopes.issue().remove_all()?,
        PurgeTarget::Record => scopes.record().remove_all()?,
        PurgeTarget::Constant { name } => scopes.constant_name(name)?.remove_all()?,
        PurgeTarget::Greeting => scopes
            .action_class::<sample::GreetingAction>()?
            .remove_all()?,
    };
    info!("Purged {} entries for {:?}", removed, target);
    Ok(removed)
}

/// Runs `command`, writing user-facing output to `out`. Returns `false`
/// when the command completed but reported a failure.
pub fn run(session: &Session, command: &Command, out: &mut impl Write) -> Result<bool> {
    let service = session.service();
    match command {
        Command::Selfcheck => {
            let report = selfcheck::run_checks(service);
            write!(out, "{report}")?;
            Ok(report.all_passed())
        }
        Command::Setup => {
            let created = sample::setup(service)?;
            if created {
                writeln!(out, "{} initialised", sample::STORAGE_NAME)?;
            } else {
                writeln!(out, "{} already initialised", sample::STORAGE_NAME)?;
            }
            Ok(true)
        }
        Command::Greeting { action } => {
            let settings = match action {
                GreetingCommand::Show => GreetingSettings::load(service)?,
                GreetingCommand::Save {
                    admin_only,
                    hello,
                    welcome,
                } => {
                    let current = GreetingSettings::load(service)?;
                    let settings = GreetingSettings {
                        admin_only: *admin_only,
                        hello_text: hello.clone().unwrap_or(current.hello_text),
                        welcome_text: welcome.clone().unwrap_or(current.welcome_text),
                    };
                    settings.save(service)?;
                    settings
                }
            };
            writeln!(out, "{}", settings.greeting())?;
            writeln!(out, "admin only: {}", settings.admin_only)?;
            Ok(true)
        }
        Command::Stats => {
            let stats = stats(session.store())?;
            for (entity_name, entry) in &stats {
                writeln!(
                    out,
                    "{entity_name}: {} partitions, {} entries",
                    entry.partitions, entry.entries
                )?;
            }
            let total = session.store().count(&EntryFilter::all())?;
            writeln!(out, "total: {total} entries")?;
            Ok(true)
        }
        Command::Keys { name, prefix } => {
            let facade = service.constant_name_storage(name)?;
            let keys = match prefix {
                Some(prefix) => facade.keys_with_prefix(prefix)?,
                None => facade.keys()?,
            };
            for key in keys {
                writeln!(out, "{key}")?;
            }
            Ok(true)
        }
        Command::Purge { target } => {
            let removed = purge(service, target)?;
            writeln!(out, "removed {removed} entries")?;
            Ok(true)
        }
    }
}
