//! The raw per-partition handle.

use crate::{EntryKind, EntryValue, PropertyStoreError, StoreResult};
use chrono::{DateTime, Utc};

/// Handle to one `(entity_name, entity_id)` partition of a property engine.
///
/// Backends implement the untyped primitives; the typed accessors are
/// provided on top of them. Keys passed here are physical keys. A typed
/// getter returns the kind's absent value for a missing key and fails with
/// [`PropertyStoreError::TypeMismatch`] when the key holds another kind.
pub trait PropertySet: Send + Sync {
    fn entity_name(&self) -> &str;

    fn entity_id(&self) -> Option<i64>;

    /// Reads the entry stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<EntryValue>>;

    /// Writes `value` under `key`, replacing any entry of any kind.
    fn set(&self, key: &str, value: EntryValue) -> StoreResult<()>;

    /// Deletes `key`. Returns whether an entry was removed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Keys starting with `prefix`, in ascending order. An empty prefix
    /// lists the whole partition.
    fn keys(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Kind of the entry under `key`, if present.
    fn kind_of(&self, key: &str) -> StoreResult<Option<EntryKind>> {
        Ok(self.get(key)?.map(|v| v.kind()))
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.kind_of(key)?.is_some())
    }

    fn get_boolean(&self, key: &str) -> StoreResult<bool> {
        match self.get(key)? {
            None => Ok(false),
            Some(EntryValue::Boolean(b)) => Ok(b),
            Some(other) => Err(mismatch(key, EntryKind::Boolean, &other)),
        }
    }

    fn set_boolean(&self, key: &str, value: bool) -> StoreResult<()> {
        self.set(key, EntryValue::Boolean(value))
    }

    fn get_long(&self, key: &str) -> StoreResult<Option<i64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(EntryValue::Long(n)) => Ok(Some(n)),
            Some(other) => Err(mismatch(key, EntryKind::Long, &other)),
        }
    }

    fn set_long(&self, key: &str, value: i64) -> StoreResult<()> {
        self.set(key, EntryValue::Long(value))
    }

    fn get_date(&self, key: &str) -> StoreResult<Option<DateTime<Utc>>> {
        match self.get(key)? {
            None => Ok(None),
            Some(EntryValue::Date(d)) => Ok(Some(d)),
            Some(other) => Err(mismatch(key, EntryKind::Date, &other)),
        }
    }

    fn set_date(&self, key: &str, value: DateTime<Utc>) -> StoreResult<()> {
        self.set(key, EntryValue::Date(value))
    }

    fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(EntryValue::String(s)) => Ok(s),
            Some(other) => Err(mismatch(key, EntryKind::String, &other)),
        }
    }

    fn set_string(&self, key: &str, value: Option<&str>) -> StoreResult<()> {
        self.set(key, EntryValue::String(value.map(str::to_owned)))
    }

    fn get_text(&self, key: &str) -> StoreResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(EntryValue::Text(s)) => Ok(s),
            Some(other) => Err(mismatch(key, EntryKind::Text, &other)),
        }
    }

    fn set_text(&self, key: &str, value: Option<&str>) -> StoreResult<()> {
        self.set(key, EntryValue::Text(value.map(str::to_owned)))
    }

    fn get_data(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match self.get(key)? {
            None => Ok(None),
            Some(EntryValue::Data(bytes)) => Ok(Some(bytes)),
            Some(other) => Err(mismatch(key, EntryKind::Data, &other)),
        }
    }

    fn set_data(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.set(key, EntryValue::Data(value.to_vec()))
    }
}

fn mismatch(key: &str, expected: EntryKind, found: &EntryValue) -> PropertyStoreError {
    PropertyStoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        actual: found.kind(),
    }
}
