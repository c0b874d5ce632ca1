//! Typed entry values and their physical kinds.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Physical kind of a stored entry, persisted in the `kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Boolean,
    Long,
    Date,
    /// Short string, `string_value` column.
    String,
    /// Long text, `text_value` column.
    Text,
    Data,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Long => "long",
            Self::Date => "date",
            Self::String => "string",
            Self::Text => "text",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "long" => Ok(Self::Long),
            "date" => Ok(Self::Date),
            "string" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "data" => Ok(Self::Data),
            other => Err(format!("unknown entry kind: {other}")),
        }
    }
}

/// A value as held by the engine.
///
/// String and text entries may hold the engine's null string: the key exists
/// but carries no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Boolean(bool),
    Long(i64),
    Date(DateTime<Utc>),
    String(Option<String>),
    Text(Option<String>),
    Data(Vec<u8>),
}

impl EntryValue {
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::Boolean(_) => EntryKind::Boolean,
            Self::Long(_) => EntryKind::Long,
            Self::Date(_) => EntryKind::Date,
            Self::String(_) => EntryKind::String,
            Self::Text(_) => EntryKind::Text,
            Self::Data(_) => EntryKind::Data,
        }
    }
}
