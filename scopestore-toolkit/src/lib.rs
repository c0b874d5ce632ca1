//! Typed, namespaced property storage for scopestore.
//!
//! Callers never address the backing engine directly. They resolve a
//! [`Scope`] for a domain context (a project, an issue, a record, a fixed
//! name or an action type) and get back a [`StorageFacade`] whose keys are
//! confined to the partition and key prefix of that context:
//!
//! ```text
//! context -> Scope::load -> Identity -> ScopeBridge::open -> StorageFacade
//! ```
//!
//! Each scope can also delete the data of all of its contexts through one
//! filtered delete ([`Scope::remove_all`]).
//!
//! [`DefaultStorageService`] bundles the standard [`Scopes`] over a SQLite
//! engine, and [`selfcheck`] runs a save/delete suite against it.

mod bridge;
mod error;
mod facade;
pub mod scope;
pub mod scopes;
pub mod selfcheck;
mod service;

pub use bridge::{DefaultScopeBridge, ScopeBridge};
pub use error::{StorageError, StorageResult};
pub use facade::StorageFacade;
pub use scope::{Scope, ScopeBuilder};
pub use scopes::Scopes;
pub use service::{DefaultStorageService, StorageService, StorageServiceExt};

pub use scopestore_types::{Action, GenericRecord, Identity, Issue, Project, Properties};
