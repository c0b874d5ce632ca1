//! SQLite property storage engine for scopestore.
//!
//! Provides the untyped key/value engine the toolkit builds on: typed
//! entries grouped into partitions addressed by `(entity_name, entity_id)`.
//!
//! # Architecture
//!
//! - [`PropertyEntryStore`] owns the shared connection and the
//!   `property_entry` table, and deletes by [`EntryFilter`] without opening
//!   any partition
//! - [`PropertySet`] is the per-partition handle; [`SqlitePropertySet`] is
//!   its SQLite implementation
//! - Each entry records its [`EntryKind`], so reading a key through the
//!   wrong getter is reported instead of silently converted
//!
//! Single statements are atomic. Sequences of statements issued by callers
//! are not.

mod entry;
mod error;
mod property_set;
mod store;

pub use entry::{EntryKind, EntryValue};
pub use error::{PropertyStoreError, StoreResult};
pub use property_set::PropertySet;
pub use store::{EntryFilter, PropertyEntryStore, SqlitePropertySet};
