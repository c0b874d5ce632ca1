//! The service callers resolve facades through.

use crate::{DefaultScopeBridge, ScopeBridge, Scopes, StorageFacade, StorageResult};
use scopestore_storage::PropertyEntryStore;
use scopestore_types::{Action, GenericRecord, Issue, Project};
use std::sync::Arc;

/// Entry point for callers that want a facade for a domain context.
///
/// Object safe; the typed action lookups live on [`StorageServiceExt`].
pub trait StorageService {
    fn project_storage(&self, project: &(dyn Project + 'static)) -> StorageResult<StorageFacade>;

    fn issue_storage(&self, issue: &(dyn Issue + 'static)) -> StorageResult<StorageFacade>;

    fn record_storage(&self, record: &GenericRecord) -> StorageResult<StorageFacade>;

    fn constant_name_storage(&self, name: &str) -> StorageResult<StorageFacade>;

    /// Configuration storage of the action named `action_name`
    /// (an [`Action::NAME`]).
    fn action_name_storage(&self, action_name: &str) -> StorageResult<StorageFacade>;
}

/// Typed action lookups for every [`StorageService`], trait objects included.
pub trait StorageServiceExt: StorageService {
    /// Configuration storage of the action's type.
    fn action_storage<A: Action>(&self, _action: &A) -> StorageResult<StorageFacade> {
        self.action_name_storage(A::NAME)
    }

    /// Same partition as [`StorageServiceExt::action_storage`], without an
    /// instance.
    fn action_type_storage<A: Action>(&self) -> StorageResult<StorageFacade> {
        self.action_name_storage(A::NAME)
    }
}

impl<S: StorageService + ?Sized> StorageServiceExt for S {}

/// [`StorageService`] over the standard [`Scopes`].
#[derive(Clone)]
pub struct DefaultStorageService {
    scopes: Scopes,
}

impl DefaultStorageService {
    pub fn new(bridge: Arc<dyn ScopeBridge>) -> StorageResult<Self> {
        Ok(Self {
            scopes: Scopes::new(bridge)?,
        })
    }

    pub fn with_store(store: PropertyEntryStore) -> StorageResult<Self> {
        Self::new(Arc::new(DefaultScopeBridge::new(store)))
    }

    /// Service over a private in-memory store (for testing).
    pub fn in_memory() -> StorageResult<Self> {
        Self::new(Arc::new(DefaultScopeBridge::in_memory()?))
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }
}

impl StorageService for DefaultStorageService {
    fn project_storage(&self, project: &(dyn Project + 'static)) -> StorageResult<StorageFacade> {
        self.scopes.project().load(project)
    }

    fn issue_storage(&self, issue: &(dyn Issue + 'static)) -> StorageResult<StorageFacade> {
        self.scopes.issue().load(issue)
    }

    fn record_storage(&self, record: &GenericRecord) -> StorageResult<StorageFacade> {
        self.scopes.record().load(record)
    }

    fn constant_name_storage(&self, name: &str) -> StorageResult<StorageFacade> {
        self.scopes.constant_name(name)?.load(name)
    }

    fn action_name_storage(&self, action_name: &str) -> StorageResult<StorageFacade> {
        self.scopes.action_named(action_name)?.load(&())
    }
}
