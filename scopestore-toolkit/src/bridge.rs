//! The seam between scopes and the backing engine.

use crate::StorageResult;
use scopestore_storage::{EntryFilter, PropertyEntryStore, PropertySet};
use scopestore_types::Identity;
use serde_json::Value;
use tracing::debug;

/// Access to the backing engine as needed by scopes and facades.
///
/// Implementations must be shareable across threads; one bridge usually
/// serves every scope of a service.
pub trait ScopeBridge: Send + Sync {
    /// Opens the partition addressed by the identity's entity name and id.
    /// Partitions are created lazily by the engine.
    fn open(&self, identity: &Identity) -> StorageResult<Box<dyn PropertySet>>;

    /// Deletes the conjunction of the present, non-blank fields without
    /// opening a partition. Returns the number of removed entries.
    fn remove_by_filter(
        &self,
        entity_id: Option<i64>,
        entity_name: Option<&str>,
        key_prefix: Option<&str>,
    ) -> StorageResult<usize>;

    /// Deletes every key of the handle's partition, one at a time.
    ///
    /// Stops at the first failing delete. Keys deleted before the failure
    /// stay deleted.
    fn remove_all(&self, handle: &dyn PropertySet) -> StorageResult<()> {
        let keys = handle.keys("")?;
        for key in &keys {
            handle.remove(key)?;
        }
        debug!(
            "Removed {} keys from {}[{:?}]",
            keys.len(),
            handle.entity_name(),
            handle.entity_id()
        );
        Ok(())
    }

    /// Renders a structured value as JSON text.
    fn serialize(&self, value: Option<&Value>) -> StorageResult<Option<String>> {
        Ok(value.map(serde_json::to_string).transpose()?)
    }

    /// Parses JSON text produced by [`ScopeBridge::serialize`].
    fn deserialize(&self, text: Option<&str>) -> StorageResult<Option<Value>> {
        Ok(text.map(serde_json::from_str).transpose()?)
    }
}

/// Bridge over a [`PropertyEntryStore`].
#[derive(Clone)]
pub struct DefaultScopeBridge {
    store: PropertyEntryStore,
}

impl DefaultScopeBridge {
    pub fn new(store: PropertyEntryStore) -> Self {
        Self { store }
    }

    /// Bridge over a private in-memory store (for testing).
    pub fn in_memory() -> StorageResult<Self> {
        Ok(Self::new(PropertyEntryStore::open_in_memory()?))
    }

    pub fn store(&self) -> &PropertyEntryStore {
        &self.store
    }
}

impl ScopeBridge for DefaultScopeBridge {
    fn open(&self, identity: &Identity) -> StorageResult<Box<dyn PropertySet>> {
        let set = self
            .store
            .property_set(identity.entity_name(), identity.entity_id());
        Ok(Box::new(set))
    }

    fn remove_by_filter(
        &self,
        entity_id: Option<i64>,
        entity_name: Option<&str>,
        key_prefix: Option<&str>,
    ) -> StorageResult<usize> {
        let filter = EntryFilter::new(entity_id, entity_name, key_prefix);
        Ok(self.store.remove_by_filter(&filter)?)
    }
}
