//! Async repository trait for the settings table.
//!
//! There is no upsert. Update and create fail in two distinct ways
//! (`NotFound` vs `DuplicateKey`) and the batch persister combines them.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send`, which `tokio::spawn` requires.

use super::PersistenceError;
use settings::{SettingRecord, SettingWrite};
use std::future::Future;

/// Single-row access to the `site_settings` table.
///
/// Implementations must make every write atomic for its row. There is no
/// domain filtering here; callers filter by key prefix.
pub trait SettingRepository: Send + Sync {
    /// Every row, in insertion order.
    fn list_all(
        &self,
    ) -> impl Future<Output = Result<Vec<SettingRecord>, PersistenceError>> + Send;

    /// Fails with [`PersistenceError::NotFound`] if `key` does not exist.
    fn get_by_key(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<SettingRecord, PersistenceError>> + Send;

    /// Fails with [`PersistenceError::DuplicateKey`] if the key already exists.
    fn create(
        &self,
        write: &SettingWrite,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Fails with [`PersistenceError::NotFound`] if the key does not exist.
    fn update_by_key(
        &self,
        write: &SettingWrite,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}
