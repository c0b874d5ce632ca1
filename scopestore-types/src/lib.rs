//! Core type definitions for scopestore.
//!
//! This crate defines the plugin-agnostic values shared by the storage
//! engine and the toolkit:
//! - [`Identity`]: the (key prefix, entity name, entity id) triple that
//!   addresses one storage partition
//! - [`Properties`]: a string-keyed property bag
//! - the domain contexts a scope can be derived from ([`Project`],
//!   [`Issue`], [`Action`], [`GenericRecord`])
//!
//! Nothing here performs I/O.

mod context;
mod identity;
mod properties;
mod record;

pub use context::{Action, Issue, Project};
pub use identity::Identity;
pub use properties::Properties;
pub use record::GenericRecord;
