//! Typed CRUD over one storage partition.

use crate::{ScopeBridge, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use scopestore_storage::PropertySet;
use scopestore_types::{Identity, Properties};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A partition handle bound to the identity it was opened for.
///
/// Keys passed to a facade are logical keys; each one is stored under the
/// identity's key prefix. A facade is cheap and meant to be short-lived:
/// resolve a new one per request.
pub struct StorageFacade {
    identity: Identity,
    bridge: Arc<dyn ScopeBridge>,
    handle: Box<dyn PropertySet>,
}

impl StorageFacade {
    pub fn new(identity: Identity, bridge: Arc<dyn ScopeBridge>, handle: Box<dyn PropertySet>) -> Self {
        Self {
            identity,
            bridge,
            handle,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn key(&self, key: &str) -> String {
        self.identity.physical_key(key)
    }

    // ── Boolean ──

    pub fn set_boolean(&self, key: &str, value: bool) -> StorageResult<()> {
        Ok(self.handle.set_boolean(&self.key(key), value)?)
    }

    /// Absent keys read as `false`.
    pub fn get_boolean(&self, key: &str) -> StorageResult<bool> {
        Ok(self.handle.get_boolean(&self.key(key))?)
    }

    // ── Data ──

    pub fn set_data(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        Ok(self.handle.set_data(&self.key(key), value)?)
    }

    pub fn get_data(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.handle.get_data(&self.key(key))?)
    }

    // ── Date ──

    /// Stores `value` at millisecond precision.
    pub fn set_date(&self, key: &str, value: DateTime<Utc>) -> StorageResult<()> {
        Ok(self.handle.set_date(&self.key(key), value)?)
    }

    pub fn get_date(&self, key: &str) -> StorageResult<Option<DateTime<Utc>>> {
        Ok(self.handle.get_date(&self.key(key))?)
    }

    // ── Decimal ──

    /// Stores a decimal as its canonical text. `None` deletes the key.
    pub fn set_decimal(&self, key: &str, value: Option<Decimal>) -> StorageResult<()> {
        let physical = self.key(key);
        match value {
            Some(decimal) => self.handle.set_string(&physical, Some(&decimal.to_string()))?,
            None => {
                self.handle.remove(&physical)?;
            }
        }
        Ok(())
    }

    pub fn get_decimal(&self, key: &str) -> StorageResult<Option<Decimal>> {
        let Some(text) = self.handle.get_string(&self.key(key))? else {
            return Ok(None);
        };
        Decimal::from_str(text.trim())
            .map(Some)
            .map_err(|_| StorageError::InvalidDecimal {
                key: key.to_string(),
                value: text,
            })
    }

    // ── Long ──

    /// `None` deletes the key.
    pub fn set_long(&self, key: &str, value: Option<i64>) -> StorageResult<()> {
        let physical = self.key(key);
        match value {
            Some(n) => self.handle.set_long(&physical, n)?,
            None => {
                self.handle.remove(&physical)?;
            }
        }
        Ok(())
    }

    /// Absent keys read as `None`, never zero.
    pub fn get_long(&self, key: &str) -> StorageResult<Option<i64>> {
        Ok(self.handle.get_long(&self.key(key))?)
    }

    // ── String / text ──

    /// `None` stores the engine's null string; the key exists afterwards.
    pub fn set_string(&self, key: &str, value: Option<&str>) -> StorageResult<()> {
        Ok(self.handle.set_string(&self.key(key), value)?)
    }

    pub fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.handle.get_string(&self.key(key))?)
    }

    /// Long-text variant of [`StorageFacade::set_string`].
    pub fn set_text(&self, key: &str, value: Option<&str>) -> StorageResult<()> {
        Ok(self.handle.set_text(&self.key(key), value)?)
    }

    pub fn get_text(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.handle.get_text(&self.key(key))?)
    }

    // ── Structured values ──

    /// Stores any serializable value through the bridge's serializer.
    /// `None` deletes the key.
    pub fn set_object<T>(&self, key: &str, value: Option<&T>) -> StorageResult<()>
    where
        T: Serialize + ?Sized,
    {
        match value {
            Some(object) => {
                let value = serde_json::to_value(object)?;
                self.set_value(key, &value)
            }
            None => self.remove(key).map(|_| ()),
        }
    }

    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        Ok(self
            .get_value(key)?
            .map(serde_json::from_value)
            .transpose()?)
    }

    /// Stores a property bag as a JSON mapping. `None` deletes the key.
    pub fn set_properties(&self, key: &str, value: Option<&Properties>) -> StorageResult<()> {
        self.set_object(key, value)
    }

    /// Rebuilds a property bag. Non-string values in the stored mapping are
    /// rendered as their JSON text.
    pub fn get_properties(&self, key: &str) -> StorageResult<Option<Properties>> {
        let Some(value) = self.get_value(key)? else {
            return Ok(None);
        };
        match value {
            Value::Object(map) => Ok(Some(
                map.into_iter()
                    .map(|(k, v)| match v {
                        Value::String(s) => (k, s),
                        other => (k, other.to_string()),
                    })
                    .collect(),
            )),
            other => Ok(Some(serde_json::from_value(other)?)),
        }
    }

    fn set_value(&self, key: &str, value: &Value) -> StorageResult<()> {
        let text = self.bridge.serialize(Some(value))?;
        Ok(self.handle.set_text(&self.key(key), text.as_deref())?)
    }

    fn get_value(&self, key: &str) -> StorageResult<Option<Value>> {
        let text = self.handle.get_text(&self.key(key))?;
        self.bridge.deserialize(text.as_deref())
    }

    // ── Keys ──

    pub fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.handle.exists(&self.key(key))?)
    }

    /// Deletes one key. Returns whether anything was removed.
    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        Ok(self.handle.remove(&self.key(key))?)
    }

    /// Clears the whole partition, including keys written under another
    /// prefix.
    pub fn remove_all(&self) -> StorageResult<()> {
        self.bridge.remove_all(self.handle.as_ref())
    }

    /// Logical keys of this facade, sorted.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        self.keys_with_prefix("")
    }

    /// Logical keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let physical = self.handle.keys(&self.key(prefix))?;
        Ok(physical
            .iter()
            .filter_map(|key| self.identity.logical_key(key))
            .map(str::to_owned)
            .collect())
    }
}

impl fmt::Debug for StorageFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageFacade")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
