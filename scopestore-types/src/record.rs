//! Generic host records.

use serde::{Deserialize, Serialize};

/// A generic host record: an entity name plus a JSON field map.
///
/// Records stand in for rows of arbitrary host tables. The storage scope for
/// a record is keyed by its numeric `id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericRecord {
    pub entity_name: String,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl GenericRecord {
    /// Field holding the record's numeric id.
    pub const ID_FIELD: &'static str = "id";

    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }

    /// Extract a string field.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// Extract an integer field. Numeric strings are accepted.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The record's numeric id, if it has a usable one.
    pub fn id(&self) -> Option<i64> {
        self.get_i64(Self::ID_FIELD)
    }
}
