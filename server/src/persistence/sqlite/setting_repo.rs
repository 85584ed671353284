//! SQLite-backed implementation of [`SettingRepository`].

use settings::{SettingRecord, SettingWrite};
use sqlx::SqlitePool;

use super::helpers::{decode_row, encode_timestamp, SettingRow, SELECT_COLUMNS};
use crate::persistence::traits::SettingRepository;
use crate::persistence::{now_timestamp, PersistenceError};

pub struct SqliteSettingRepository {
    pool: SqlitePool,
}

impl SqliteSettingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SettingRepository for SqliteSettingRepository {
    async fn list_all(&self) -> Result<Vec<SettingRecord>, PersistenceError> {
        let rows: Vec<SettingRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(decode_row).collect())
    }

    async fn get_by_key(&self, key: &str) -> Result<SettingRecord, PersistenceError> {
        let row: Option<SettingRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE setting_key = ?"))
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        row.map(decode_row).ok_or_else(|| PersistenceError::NotFound {
            key: key.to_string(),
        })
    }

    async fn create(&self, write: &SettingWrite) -> Result<(), PersistenceError> {
        let result = sqlx::query(
            "INSERT INTO site_settings (setting_key, setting_type, setting_value, updated_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&write.key)
        .bind(write.declared_type.as_str())
        .bind(&write.raw_value)
        .bind(encode_timestamp(now_timestamp()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(PersistenceError::DuplicateKey {
                    key: write.key.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_by_key(&self, write: &SettingWrite) -> Result<(), PersistenceError> {
        let result = sqlx::query(
            "UPDATE site_settings \
             SET setting_type = ?, setting_value = ?, updated_at = ? \
             WHERE setting_key = ?",
        )
        .bind(write.declared_type.as_str())
        .bind(&write.raw_value)
        .bind(encode_timestamp(now_timestamp()))
        .bind(&write.key)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::NotFound {
                key: write.key.clone(),
            });
        }

        Ok(())
    }
}
