//! Scopes map domain contexts to storage partitions.
//!
//! A [`Scope`] is assembled by a [`ScopeBuilder`] from two rules: one that
//! derives an [`Identity`] from a context value, and one that deletes the
//! data of every context of the scope at once. The free functions at the
//! bottom of this module produce the rules used by the standard scopes.

use crate::{ScopeBridge, StorageError, StorageFacade, StorageResult};
use scopestore_types::{GenericRecord, Identity};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

type DeriveRule<C> = Arc<dyn Fn(&C) -> Identity + Send + Sync>;
type DeleteAllRule = Arc<dyn Fn(&dyn ScopeBridge) -> StorageResult<usize> + Send + Sync>;

/// Resolves contexts of type `C` to facades over their partitions.
pub struct Scope<C: ?Sized + 'static> {
    bridge: Arc<dyn ScopeBridge>,
    derive: DeriveRule<C>,
    delete_all: DeleteAllRule,
}

impl<C: ?Sized + 'static> Scope<C> {
    /// The identity `context` maps to.
    pub fn identity(&self, context: &C) -> Identity {
        (self.derive)(context)
    }

    /// Opens the partition of `context` and binds a facade to it.
    pub fn load(&self, context: &C) -> StorageResult<StorageFacade> {
        let identity = self.identity(context);
        let handle = self.bridge.open(&identity)?;
        debug!("Loaded storage {}", identity);
        Ok(StorageFacade::new(identity, Arc::clone(&self.bridge), handle))
    }

    /// Deletes every entry in the partition of `context`.
    pub fn remove(&self, context: &C) -> StorageResult<()> {
        let identity = self.identity(context);
        let handle = self.bridge.open(&identity)?;
        self.bridge.remove_all(handle.as_ref())?;
        info!("Cleared storage {}", identity);
        Ok(())
    }

    /// Deletes the data of every context of this scope. Returns the number
    /// of removed entries.
    pub fn remove_all(&self) -> StorageResult<usize> {
        (self.delete_all)(self.bridge.as_ref())
    }

    pub fn bridge(&self) -> &Arc<dyn ScopeBridge> {
        &self.bridge
    }
}

impl<C: ?Sized + 'static> Clone for Scope<C> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            derive: Arc::clone(&self.derive),
            delete_all: Arc::clone(&self.delete_all),
        }
    }
}

impl<C: ?Sized + 'static> fmt::Debug for Scope<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("context", &std::any::type_name::<C>())
            .finish_non_exhaustive()
    }
}

/// Collects the two rules of a scope.
///
/// Builders are reusable: [`ScopeBuilder::adapt`] and
/// [`ScopeBuilder::build`] leave the builder untouched.
pub struct ScopeBuilder<T: ?Sized + 'static> {
    derive: Option<DeriveRule<T>>,
    delete_all: Option<DeleteAllRule>,
}

impl<T: ?Sized + 'static> ScopeBuilder<T> {
    pub fn new<D, R>(derive: D, delete_all: R) -> Self
    where
        D: Fn(&T) -> Identity + Send + Sync + 'static,
        R: Fn(&dyn ScopeBridge) -> StorageResult<usize> + Send + Sync + 'static,
    {
        Self::default().instance_id(derive).delete_all(delete_all)
    }

    /// Sets the rule deriving a context's identity.
    #[must_use]
    pub fn instance_id<D>(mut self, derive: D) -> Self
    where
        D: Fn(&T) -> Identity + Send + Sync + 'static,
    {
        self.derive = Some(Arc::new(derive));
        self
    }

    /// Sets the rule deleting the data of the whole scope.
    #[must_use]
    pub fn delete_all<R>(mut self, delete_all: R) -> Self
    where
        R: Fn(&dyn ScopeBridge) -> StorageResult<usize> + Send + Sync + 'static,
    {
        self.delete_all = Some(Arc::new(delete_all));
        self
    }

    /// Reuses this builder for contexts of type `U`.
    ///
    /// The new identity rule is `u -> derive(transform(u))`; the delete-all
    /// rule is shared unchanged.
    pub fn adapt<U, F>(&self, transform: F) -> ScopeBuilder<U>
    where
        T: Sized,
        U: ?Sized + 'static,
        F: Fn(&U) -> T + Send + Sync + 'static,
    {
        let derive = self.derive.clone().map(|derive| {
            Arc::new(move |context: &U| derive(&transform(context))) as DeriveRule<U>
        });
        ScopeBuilder {
            derive,
            delete_all: self.delete_all.clone(),
        }
    }

    /// Produces a scope over `bridge`. Fails if either rule is missing.
    pub fn build(&self, bridge: Arc<dyn ScopeBridge>) -> StorageResult<Scope<T>> {
        let derive = self
            .derive
            .clone()
            .ok_or(StorageError::IncompleteScope("instance id"))?;
        let delete_all = self
            .delete_all
            .clone()
            .ok_or(StorageError::IncompleteScope("delete-all"))?;
        Ok(Scope {
            bridge,
            derive,
            delete_all,
        })
    }
}

impl<T: ?Sized + 'static> Default for ScopeBuilder<T> {
    fn default() -> Self {
        Self {
            derive: None,
            delete_all: None,
        }
    }
}

impl<T: ?Sized + 'static> Clone for ScopeBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            derive: self.derive.clone(),
            delete_all: self.delete_all.clone(),
        }
    }
}

// ── Rules ──

/// Identity rule for contexts reduced to a numeric id.
pub fn long_id_entity(
    entity_name: &str,
    key_prefix: &str,
) -> impl Fn(&i64) -> Identity + Send + Sync + 'static + use<> {
    let entity_name = entity_name.to_owned();
    let key_prefix = key_prefix.to_owned();
    move |id: &i64| Identity::new(key_prefix.as_str(), entity_name.as_str(), Some(*id))
}

/// Identity rule mapping every context to one fixed partition.
pub fn constant_id_entity<U: ?Sized + 'static>(
    entity_id: i64,
    entity_name: &str,
    key_prefix: &str,
) -> impl Fn(&U) -> Identity + Send + Sync + 'static + use<U> {
    let entity_name = entity_name.to_owned();
    let key_prefix = key_prefix.to_owned();
    move |_: &U| Identity::new(key_prefix.as_str(), entity_name.as_str(), Some(entity_id))
}

/// Identity rule reading a record's `id` field. Records without a usable
/// id map to the partition with no entity id.
pub fn record_id_entity(
    entity_name: &str,
    key_prefix: &str,
) -> impl Fn(&GenericRecord) -> Identity + Send + Sync + 'static + use<> {
    let entity_name = entity_name.to_owned();
    let key_prefix = key_prefix.to_owned();
    move |record: &GenericRecord| {
        Identity::new(key_prefix.as_str(), entity_name.as_str(), record.id())
    }
}

/// Delete-all rule removing every entry of the entity name written under
/// the key prefix, whatever the entity id.
pub fn delete_by_name_prefix(
    entity_name: &str,
    key_prefix: &str,
) -> impl Fn(&dyn ScopeBridge) -> StorageResult<usize> + Send + Sync + 'static + use<> {
    let entity_name = entity_name.to_owned();
    let key_prefix = key_prefix.to_owned();
    move |bridge: &dyn ScopeBridge| {
        bridge.remove_by_filter(None, Some(entity_name.as_str()), Some(key_prefix.as_str()))
    }
}

/// Delete-all rule for scopes living in one fixed partition.
pub fn delete_by_constant_id(
    entity_id: i64,
    entity_name: &str,
    key_prefix: &str,
) -> impl Fn(&dyn ScopeBridge) -> StorageResult<usize> + Send + Sync + 'static + use<> {
    let entity_name = entity_name.to_owned();
    let key_prefix = key_prefix.to_owned();
    move |bridge: &dyn ScopeBridge| {
        bridge.remove_by_filter(Some(entity_id), Some(entity_name.as_str()), Some(key_prefix.as_str()))
    }
}
