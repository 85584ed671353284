//! Row types of the settings table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, DeclaredType};

/// One persisted setting.
///
/// `key` is unique across the whole table. Grouping into panels happens only
/// through key prefixes (see [`crate::domain`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRecord {
    pub id: i64,
    pub key: String,
    pub declared_type: DeclaredType,
    pub raw_value: String,
    /// Unix seconds of the last write.
    pub updated_at: u64,
}

impl SettingRecord {
    /// The stored value run through [`codec::decode`].
    pub fn decoded(&self) -> Value {
        codec::decode(&self.raw_value, self.declared_type)
    }
}

/// Payload of a single create or update against the settings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingWrite {
    pub key: String,
    pub declared_type: DeclaredType,
    pub raw_value: String,
}

impl SettingWrite {
    /// Build a write by encoding `value` under `declared_type`.
    pub fn encode(key: impl Into<String>, declared_type: DeclaredType, value: &Value) -> Self {
        Self {
            key: key.into(),
            declared_type,
            raw_value: codec::encode(value, declared_type),
        }
    }

    /// Build a write from text that is already in its stored form.
    pub fn raw(key: impl Into<String>, declared_type: DeclaredType, raw_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            declared_type,
            raw_value: raw_value.into(),
        }
    }
}
