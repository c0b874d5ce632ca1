//! SQLite property-entry store.
//!
//! All partitions share one `property_entry` table. A partition is the set
//! of rows with a given `(entity_name, entity_id)`; `entity_id` may be NULL,
//! so every lookup compares it with `IS`.

use crate::{EntryKind, EntryValue, PropertySet, PropertyStoreError, StoreResult};
use chrono::DateTime;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use scopestore_db::DbConfig;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS property_entry (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        entity_name TEXT NOT NULL,
        entity_id INTEGER,
        property_key TEXT NOT NULL,
        kind TEXT NOT NULL,
        number_value INTEGER,
        string_value TEXT,
        text_value TEXT,
        data_value BLOB
    );

    CREATE INDEX IF NOT EXISTS idx_property_entry_partition
        ON property_entry (entity_name, entity_id, property_key);
";

type RawRow = (
    String,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<Vec<u8>>,
);

/// Persistent property store backed by SQLite.
///
/// Cloning is cheap; clones share the connection.
#[derive(Clone)]
pub struct PropertyEntryStore {
    conn: Arc<Mutex<Connection>>,
}

impl PropertyEntryStore {
    /// Opens (or creates) a store as described by `config`.
    pub fn open(config: &DbConfig) -> StoreResult<Self> {
        let conn = scopestore_db::open_connection(config)?;
        Self::open_with_conn(Arc::new(Mutex::new(conn)))
    }

    /// Opens a private in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = scopestore_db::open_in_memory()?;
        Self::open_with_conn(Arc::new(Mutex::new(conn)))
    }

    /// Wraps an existing connection, creating the schema if needed.
    pub fn open_with_conn(conn: Arc<Mutex<Connection>>) -> StoreResult<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        info!("Property entry schema ready");
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| PropertyStoreError::LockPoisoned)
    }

    /// Returns the handle for one partition. Partitions exist implicitly;
    /// nothing is written until the first `set`.
    pub fn property_set(&self, entity_name: &str, entity_id: Option<i64>) -> SqlitePropertySet {
        debug!("Opening property set {}[{:?}]", entity_name, entity_id);
        SqlitePropertySet {
            store: self.clone(),
            entity_name: entity_name.to_string(),
            entity_id,
        }
    }

    /// Deletes every entry matching `filter` in one statement.
    pub fn remove_by_filter(&self, filter: &EntryFilter) -> StoreResult<usize> {
        if filter.is_unbounded() {
            warn!("Filter has no conditions, removing every property entry");
        }
        let (clause, values) = filter.where_clause();
        let sql = format!("DELETE FROM property_entry{clause}");

        let conn = self.lock()?;
        let removed = conn.execute(&sql, params_from_iter(values))?;
        info!("Removed {} property entries matching {}", removed, filter);
        Ok(removed)
    }

    /// Counts entries matching `filter`.
    pub fn count(&self, filter: &EntryFilter) -> StoreResult<usize> {
        let (clause, values) = filter.where_clause();
        let sql = format!("SELECT COUNT(*) FROM property_entry{clause}");

        let conn = self.lock()?;
        let count: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Lists the distinct partitions holding at least one entry matching
    /// `filter`, ordered by name then id.
    pub fn partitions(&self, filter: &EntryFilter) -> StoreResult<Vec<(String, Option<i64>)>> {
        let (clause, values) = filter.where_clause();
        let sql = format!(
            "SELECT DISTINCT entity_name, entity_id FROM property_entry{clause} \
             ORDER BY entity_name, entity_id"
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

/// Conjunctive filter over `(entity_id, entity_name, key prefix)`.
///
/// Absent or blank fields do not constrain the match. The key prefix is
/// matched literally and case-sensitively against the physical key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    entity_id: Option<i64>,
    entity_name: Option<String>,
    key_prefix: Option<String>,
}

impl EntryFilter {
    pub fn new(entity_id: Option<i64>, entity_name: Option<&str>, key_prefix: Option<&str>) -> Self {
        Self {
            entity_id,
            entity_name: non_blank(entity_name),
            key_prefix: non_blank(key_prefix),
        }
    }

    /// A filter matching every entry.
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entity_id(mut self, entity_id: i64) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    #[must_use]
    pub fn with_entity_name(mut self, entity_name: &str) -> Self {
        self.entity_name = non_blank(Some(entity_name));
        self
    }

    #[must_use]
    pub fn with_key_prefix(mut self, key_prefix: &str) -> Self {
        self.key_prefix = non_blank(Some(key_prefix));
        self
    }

    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }

    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    /// True when no field constrains the match.
    pub fn is_unbounded(&self) -> bool {
        self.entity_id.is_none() && self.entity_name.is_none() && self.key_prefix.is_none()
    }

    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(id) = self.entity_id {
            values.push(Value::Integer(id));
            conditions.push(format!("entity_id = ?{}", values.len()));
        }
        if let Some(name) = &self.entity_name {
            values.push(Value::Text(name.clone()));
            conditions.push(format!("entity_name = ?{}", values.len()));
        }
        if let Some(prefix) = &self.key_prefix {
            values.push(Value::Integer(prefix.chars().count() as i64));
            values.push(Value::Text(prefix.clone()));
            conditions.push(format!(
                "substr(property_key, 1, ?{}) = ?{}",
                values.len() - 1,
                values.len()
            ));
        }

        if conditions.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), values)
        }
    }
}

impl fmt::Display for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entity_id={} entity_name={} key_prefix={}",
            self.entity_id.map_or_else(|| "*".to_string(), |id| id.to_string()),
            self.entity_name.as_deref().unwrap_or("*"),
            self.key_prefix.as_deref().map_or_else(|| "*".to_string(), |p| format!("{p}*")),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_owned)
}

/// Handle to one partition of a [`PropertyEntryStore`].
pub struct SqlitePropertySet {
    store: PropertyEntryStore,
    entity_name: String,
    entity_id: Option<i64>,
}

impl PropertySet for SqlitePropertySet {
    fn entity_name(&self) -> &str {
        &self.entity_name
    }

    fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    fn get(&self, key: &str) -> StoreResult<Option<EntryValue>> {
        let conn = self.store.lock()?;
        let row: Option<RawRow> = conn
            .query_row(
                "SELECT kind, number_value, string_value, text_value, data_value
                 FROM property_entry
                 WHERE entity_name = ?1 AND entity_id IS ?2 AND property_key = ?3
                 ORDER BY id DESC LIMIT 1",
                params![self.entity_name, self.entity_id, key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .optional()?;
        drop(conn);

        row.map(|raw| decode(key, raw)).transpose()
    }

    fn set(&self, key: &str, value: EntryValue) -> StoreResult<()> {
        let kind = value.kind();
        let (number, string, text, data) = encode(value);

        let mut conn = self.store.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM property_entry
             WHERE entity_name = ?1 AND entity_id IS ?2 AND property_key = ?3",
            params![self.entity_name, self.entity_id, key],
        )?;
        tx.execute(
            "INSERT INTO property_entry
                (entity_name, entity_id, property_key, kind,
                 number_value, string_value, text_value, data_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.entity_name,
                self.entity_id,
                key,
                kind.as_str(),
                number,
                string,
                text,
                data,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let conn = self.store.lock()?;
        let removed = conn.execute(
            "DELETE FROM property_entry
             WHERE entity_name = ?1 AND entity_id IS ?2 AND property_key = ?3",
            params![self.entity_name, self.entity_id, key],
        )?;
        if removed > 0 {
            debug!("Removed {}[{:?}] {}", self.entity_name, self.entity_id, key);
        }
        Ok(removed > 0)
    }

    fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let conn = self.store.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT property_key FROM property_entry
             WHERE entity_name = ?1 AND entity_id IS ?2
               AND substr(property_key, 1, ?3) = ?4
             ORDER BY property_key",
        )?;
        let rows = stmt.query_map(
            params![
                self.entity_name,
                self.entity_id,
                prefix.chars().count() as i64,
                prefix
            ],
            |row| row.get::<_, String>(0),
        )?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

fn encode(value: EntryValue) -> (Option<i64>, Option<String>, Option<String>, Option<Vec<u8>>) {
    match value {
        EntryValue::Boolean(b) => (Some(i64::from(b)), None, None, None),
        EntryValue::Long(n) => (Some(n), None, None, None),
        EntryValue::Date(d) => (Some(d.timestamp_millis()), None, None, None),
        EntryValue::String(s) => (None, s, None, None),
        EntryValue::Text(t) => (None, None, t, None),
        EntryValue::Data(bytes) => (None, None, None, Some(bytes)),
    }
}

fn decode(key: &str, (kind, number, string, text, data): RawRow) -> StoreResult<EntryValue> {
    let kind: EntryKind = kind.parse().map_err(PropertyStoreError::InvalidData)?;
    let missing = || PropertyStoreError::InvalidData(format!("property {key} of kind {kind} has no value"));

    Ok(match kind {
        EntryKind::Boolean => EntryValue::Boolean(number.ok_or_else(missing)? != 0),
        EntryKind::Long => EntryValue::Long(number.ok_or_else(missing)?),
        EntryKind::Date => {
            let millis = number.ok_or_else(missing)?;
            let date = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                PropertyStoreError::InvalidData(format!("property {key} holds timestamp {millis} out of range"))
            })?;
            EntryValue::Date(date)
        }
        EntryKind::String => EntryValue::String(string),
        EntryKind::Text => EntryValue::Text(text),
        EntryKind::Data => EntryValue::Data(data.ok_or_else(missing)?),
    })
}
