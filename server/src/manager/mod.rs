pub mod batch;
pub mod snapshot;

use std::sync::Arc;

use serde_json::Value;
use settings::{project, CodecError, Projection, SettingRecord, SettingsDomain};

use crate::persistence::{PersistenceError, SettingRepository};
pub use batch::{BatchEntry, BatchOutcome, BatchPersister, BatchReport, WriteMode};
pub use snapshot::SettingsSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Unknown field '{field}' in {domain} settings")]
    UnknownField { domain: &'static str, field: String },
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Settings write task aborted: {0}")]
    TaskAborted(#[from] tokio::task::JoinError),
}

/// Loads and saves settings panels on top of a [`SettingRepository`].
pub struct SettingsManager<R> {
    repo: Arc<R>,
}

impl<R: SettingRepository + 'static> SettingsManager<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    /// Every stored row, unfiltered.
    pub async fn records(&self) -> Result<Vec<SettingRecord>, SettingsError> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn record(&self, key: &str) -> Result<SettingRecord, SettingsError> {
        Ok(self.repo.get_by_key(key).await?)
    }

    /// Build a fresh `D` from the current table plus defaults.
    pub async fn load<D: SettingsDomain>(&self) -> Result<Projection<D>, SettingsError> {
        let records = self.repo.list_all().await?;
        let projection = project::<D>(&records);
        tracing::info!(
            domain = D::KIND.name(),
            defaulted = projection.report.defaulted.len(),
            corrupt = projection.report.corrupt.len(),
            "Loaded settings"
        );
        Ok(projection)
    }

    /// Persist every field of `record` as an independent write.
    pub async fn save<D: SettingsDomain>(&self, record: &D) -> Result<BatchReport, SettingsError> {
        let entries = record
            .field_values()?
            .iter()
            .map(|value| BatchEntry {
                field: value.field.to_string(),
                write: value.to_write(D::KIND),
            })
            .collect();
        tracing::info!(domain = D::KIND.name(), "Saving settings");
        self.run_batch(entries).await
    }

    /// Overwrite the stored panel with its defaults.
    pub async fn reset<D: SettingsDomain>(&self) -> Result<BatchReport, SettingsError> {
        self.save(&D::default()).await
    }

    /// Replace one field of the current record and save the whole panel.
    ///
    /// The edited record is type-checked before anything is written.
    pub async fn edit_field<D: SettingsDomain>(
        &self,
        field: &str,
        value: Value,
    ) -> Result<BatchReport, SettingsError> {
        let current = self.load::<D>().await?.record;
        let mut object = serde_json::to_value(&current).map_err(CodecError::from)?;

        let Some(slot) = object.get_mut(field) else {
            return Err(SettingsError::UnknownField {
                domain: D::KIND.name(),
                field: field.to_string(),
            });
        };
        *slot = value;

        let edited: D =
            serde_json::from_value(object).map_err(|e| SettingsError::InvalidValue {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
        self.save(&edited).await
    }

    pub async fn export(&self) -> Result<SettingsSnapshot, SettingsError> {
        let records = self.repo.list_all().await?;
        Ok(SettingsSnapshot::from_records(records))
    }

    /// Replay a snapshot through the same update-or-create path as a save.
    pub async fn import(&self, snapshot: &SettingsSnapshot) -> Result<BatchReport, SettingsError> {
        tracing::info!(entries = snapshot.settings.len(), "Importing settings snapshot");
        self.run_batch(snapshot.entries()).await
    }

    /// Runs on its own task: once started, the writes complete even if the
    /// caller stops waiting for the report.
    async fn run_batch(&self, entries: Vec<BatchEntry>) -> Result<BatchReport, SettingsError> {
        let persister = BatchPersister::new(Arc::clone(&self.repo));
        let handle = tokio::spawn(async move { persister.save(&entries).await });
        let report = handle.await?;
        if !report.is_success() {
            tracing::warn!(failed = ?report.failed_fields(), "Some settings were not saved");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::mock::{Fault, MockSettingRepository};
    use serde_json::json;
    use settings::{DeclaredType, HeaderSettings, HeroSettings, SettingWrite};

    #[tokio::test]
    async fn test_load_uses_defaults_for_empty_table() {
        let manager = SettingsManager::new(MockSettingRepository::new());
        let projection = manager.load::<HeroSettings>().await.unwrap();
        assert_eq!(projection.record, HeroSettings::default());
        assert_eq!(projection.report.defaulted.len(), HeroSettings::FIELDS.len());
    }

    #[tokio::test]
    async fn test_edit_field_saves_whole_domain() {
        let manager = SettingsManager::new(MockSettingRepository::new());
        let report = manager
            .edit_field::<HeroSettings>("title", json!("New Title"))
            .await
            .unwrap();
        assert!(report.is_success());
        assert_eq!(report.written.len(), HeroSettings::FIELDS.len());

        let reloaded = manager.load::<HeroSettings>().await.unwrap().record;
        assert_eq!(reloaded.title, "New Title");
        assert_eq!(reloaded.subtitle, HeroSettings::default().subtitle);
    }

    #[tokio::test]
    async fn test_edit_unknown_field() {
        let manager = SettingsManager::new(MockSettingRepository::new());
        let err = manager
            .edit_field::<HeroSettings>("footer", json!("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnknownField { domain: "hero", .. }));
    }

    #[tokio::test]
    async fn test_edit_with_wrong_shape_writes_nothing() {
        let repo = MockSettingRepository::new();
        let manager = SettingsManager::new(repo);
        let err = manager
            .edit_field::<HeaderSettings>("sticky", json!("sometimes"))
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(manager.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_reports_partial_failure() {
        let repo = MockSettingRepository::new().with_fault("hero_cta_link", Fault::Transient);
        let manager = SettingsManager::new(repo);

        let report = manager.save(&HeroSettings::default()).await.unwrap();

        assert_eq!(
            report.outcome,
            BatchOutcome::PartiallySucceeded {
                failed: vec!["cta_link".to_string()]
            }
        );
        assert_eq!(report.written.len(), HeroSettings::FIELDS.len() - 1);
    }

    #[tokio::test]
    async fn test_dropped_save_still_writes_every_field() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let repo = MockSettingRepository::new().with_gate("hero_subtitle", Arc::clone(&gate));
        let manager = SettingsManager::new(repo);
        let repo = Arc::clone(&manager.repo);

        let edited = HeroSettings {
            title: "Dropped".to_string(),
            ..HeroSettings::default()
        };
        let mut save = Box::pin(manager.save(&edited));

        // Drive the save until the title has been written and the batch is
        // parked on the subtitle, then stop waiting for it.
        while repo.create_count() == 0 {
            tokio::select! {
                biased;
                _ = &mut save => panic!("save finished while a write was held"),
                _ = tokio::task::yield_now() => {}
            }
        }
        drop(save);
        gate.notify_one();

        let keys: Vec<String> = HeroSettings::FIELDS
            .iter()
            .map(|field| HeroSettings::KIND.key_for(field))
            .collect();
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while keys.iter().any(|key| repo.raw_value(key).is_none()) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("batch did not finish after its caller went away");

        assert_eq!(repo.raw_value("hero_title").as_deref(), Some("\"Dropped\""));
        assert_eq!(repo.create_count(), HeroSettings::FIELDS.len());
    }

    #[tokio::test]
    async fn test_record_lookup() {
        let repo = MockSettingRepository::new()
            .with_row(SettingWrite::raw("hero_title", DeclaredType::String, "Bare"));
        let manager = SettingsManager::new(repo);
        assert_eq!(manager.record("hero_title").await.unwrap().raw_value, "Bare");
        assert!(matches!(
            manager.record("hero_nope").await.unwrap_err(),
            SettingsError::Persistence(PersistenceError::NotFound { .. })
        ));
    }
}
