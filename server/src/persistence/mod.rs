mod traits;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod mock;

pub use traits::SettingRepository;

use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Setting '{key}' does not exist")]
    NotFound { key: String },
    #[error("Setting '{key}' already exists")]
    DuplicateKey { key: String },
}

impl PersistenceError {
    /// The key has never been created. Expected on the first save of a new field.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Another writer created the key first.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

/// Get the current unix timestamp in seconds.
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
