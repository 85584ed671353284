//! Portable JSON dump of the settings table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use settings::{owner_of, DeclaredType, SettingRecord, SettingWrite};

use super::batch::BatchEntry;
use crate::persistence::{now_timestamp, PersistenceError};

/// One exported row. Field names follow the table's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub setting_key: String,
    pub setting_type: DeclaredType,
    pub setting_value: String,
    #[serde(default)]
    pub updated_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub exported_at: u64,
    pub settings: Vec<SnapshotEntry>,
}

impl SettingsSnapshot {
    /// Build a snapshot of `records`, sorted by key.
    pub fn from_records(records: Vec<SettingRecord>) -> Self {
        let mut settings: Vec<SnapshotEntry> = records
            .into_iter()
            .map(|r| SnapshotEntry {
                setting_key: r.key,
                setting_type: r.declared_type,
                setting_value: r.raw_value,
                updated_at: r.updated_at,
            })
            .collect();
        settings.sort_by(|a, b| a.setting_key.cmp(&b.setting_key));
        Self {
            exported_at: now_timestamp(),
            settings,
        }
    }

    /// Batch entries that replay this snapshot. Values are written verbatim.
    ///
    /// Rows of a known domain are labelled `domain.field`; anything else by its key.
    pub fn entries(&self) -> Vec<BatchEntry> {
        self.settings
            .iter()
            .map(|entry| {
                let field = match owner_of(&entry.setting_key) {
                    Some(kind) => format!(
                        "{}.{}",
                        kind.name(),
                        &entry.setting_key[kind.prefix().len()..]
                    ),
                    None => entry.setting_key.clone(),
                };
                BatchEntry {
                    field,
                    write: SettingWrite::raw(
                        entry.setting_key.clone(),
                        entry.setting_type,
                        entry.setting_value.clone(),
                    ),
                }
            })
            .collect()
    }

    pub fn write_to(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, PersistenceError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
