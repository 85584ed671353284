//! Shared encode/decode helpers for SQLite column <-> domain conversions.

use settings::{DeclaredType, SettingRecord};

/// Column tuple as selected from `site_settings`:
/// `(id, setting_key, setting_type, setting_value, updated_at)`.
pub type SettingRow = (i64, String, String, String, i64);

pub const SELECT_COLUMNS: &str =
    "SELECT id, setting_key, setting_type, setting_value, updated_at FROM site_settings";

/// SQLite stores integers as `i64`; timestamps past `i64::MAX` cannot occur.
pub fn encode_timestamp(ts: u64) -> i64 {
    i64::try_from(ts).unwrap_or(i64::MAX)
}

/// Negative timestamps can only come from hand-edited rows; clamp them to 0.
pub fn decode_timestamp(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

pub fn decode_row((id, key, setting_type, raw_value, updated_at): SettingRow) -> SettingRecord {
    SettingRecord {
        id,
        key,
        declared_type: DeclaredType::from_stored(&setting_type),
        raw_value,
        updated_at: decode_timestamp(updated_at),
    }
}
