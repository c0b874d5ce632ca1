//! Storage partition identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Addresses one storage partition.
///
/// The backing engine partitions entries by `(entity_name, entity_id)`;
/// `key_prefix` is prepended to every logical key written through a facade
/// bound to this identity. Equality and hashing are structural over all
/// three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    key_prefix: String,
    entity_name: String,
    entity_id: Option<i64>,
}

impl Identity {
    /// Creates an identity from its three components.
    #[must_use]
    pub fn new(
        key_prefix: impl Into<String>,
        entity_name: impl Into<String>,
        entity_id: Option<i64>,
    ) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            entity_name: entity_name.into(),
            entity_id,
        }
    }

    /// Prefix prepended to logical keys. Empty when the scope uses none.
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Entity (category) name of the partition.
    #[must_use]
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Numeric id of the partition, if any.
    #[must_use]
    pub const fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    /// Builds the physical key for a logical key.
    #[must_use]
    pub fn physical_key(&self, key: &str) -> String {
        let mut physical = String::with_capacity(self.key_prefix.len() + key.len());
        physical.push_str(&self.key_prefix);
        physical.push_str(key);
        physical
    }

    /// Strips the key prefix from a physical key.
    ///
    /// Returns `None` if the physical key was not written under this prefix.
    #[must_use]
    pub fn logical_key<'a>(&self, physical: &'a str) -> Option<&'a str> {
        physical.strip_prefix(self.key_prefix.as_str())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity_id {
            Some(id) => write!(f, "{}[{}]/{}", self.entity_name, id, self.key_prefix),
            None => write!(f, "{}[-]/{}", self.entity_name, self.key_prefix),
        }
    }
}
