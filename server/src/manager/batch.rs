//! Best-effort persistence of a set of independent single-key writes.
//!
//! For every entry, in order: try `update_by_key`; if the key does not exist
//! yet, `create` it. Any other failure is recorded against that entry and the
//! batch moves on. Writes are issued one at a time; a batch is never a
//! transaction.

use std::sync::Arc;

use settings::SettingWrite;

use crate::persistence::{PersistenceError, SettingRepository};

/// One write in a batch, labelled with the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub field: String,
    pub write: SettingWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Updated,
    Created,
}

impl WriteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Created => "created",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub field: String,
    pub key: String,
    pub mode: WriteMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: String,
    pub key: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Succeeded,
    PartiallySucceeded { failed: Vec<String> },
    Failed { failed: Vec<String> },
}

/// Aggregate result of one batch save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub written: Vec<FieldWrite>,
    pub failures: Vec<FieldFailure>,
}

impl BatchReport {
    fn new(written: Vec<FieldWrite>, failures: Vec<FieldFailure>) -> Self {
        let failed: Vec<String> = failures.iter().map(|f| f.field.clone()).collect();
        let outcome = if failed.is_empty() {
            BatchOutcome::Succeeded
        } else if written.is_empty() {
            BatchOutcome::Failed { failed }
        } else {
            BatchOutcome::PartiallySucceeded { failed }
        };
        Self {
            outcome,
            written,
            failures,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Succeeded)
    }

    pub fn failed_fields(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.field.as_str()).collect()
    }
}

/// Drives update-or-create for each entry of a batch.
pub struct BatchPersister<R> {
    repo: Arc<R>,
}

impl<R: SettingRepository> BatchPersister<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Attempt every entry in order and report what happened to each.
    pub async fn save(&self, entries: &[BatchEntry]) -> BatchReport {
        let mut written = Vec::with_capacity(entries.len());
        let mut failures = Vec::new();

        for entry in entries {
            match self.write_one(&entry.write).await {
                Ok(mode) => {
                    tracing::debug!(key = %entry.write.key, ?mode, "Setting written");
                    written.push(FieldWrite {
                        field: entry.field.clone(),
                        key: entry.write.key.clone(),
                        mode,
                    });
                }
                Err(e) => {
                    tracing::warn!(key = %entry.write.key, error = %e, "Failed to persist setting");
                    failures.push(FieldFailure {
                        field: entry.field.clone(),
                        key: entry.write.key.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = BatchReport::new(written, failures);
        tracing::info!(
            attempted = entries.len(),
            written = report.written.len(),
            failed = report.failures.len(),
            "Batch save finished"
        );
        report
    }

    async fn write_one(&self, write: &SettingWrite) -> Result<WriteMode, PersistenceError> {
        match self.repo.update_by_key(write).await {
            Ok(()) => Ok(WriteMode::Updated),
            Err(e) if e.is_not_found() => {
                tracing::info!(key = %write.key, "Setting does not exist yet, creating it");
                match self.repo.create(write).await {
                    Ok(()) => Ok(WriteMode::Created),
                    Err(e) if e.is_duplicate_key() => {
                        tracing::warn!(
                            key = %write.key,
                            "Setting was created by another writer, keeping its value"
                        );
                        Err(e)
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::mock::{Fault, MockCall, MockSettingRepository};
    use settings::DeclaredType;

    fn entry(field: &str, raw: &str) -> BatchEntry {
        BatchEntry {
            field: field.to_string(),
            write: SettingWrite::raw(format!("hero_{field}"), DeclaredType::String, raw),
        }
    }

    fn persister(repo: MockSettingRepository) -> (Arc<MockSettingRepository>, BatchPersister<MockSettingRepository>) {
        let repo = Arc::new(repo);
        (Arc::clone(&repo), BatchPersister::new(repo))
    }

    #[tokio::test]
    async fn test_new_key_is_created() {
        let (repo, persister) = persister(MockSettingRepository::new());

        let report = persister.save(&[entry("title", "\"New\"")]).await;

        assert!(report.is_success());
        assert_eq!(report.written[0].mode, WriteMode::Created);
        assert_eq!(repo.create_count(), 1);
        assert_eq!(repo.applied_update_count(), 0);
        assert_eq!(repo.raw_value("hero_title").as_deref(), Some("\"New\""));
    }

    #[tokio::test]
    async fn test_existing_key_is_updated() {
        let seeded = MockSettingRepository::new()
            .with_row(SettingWrite::raw("hero_title", DeclaredType::String, "\"Old\""));
        let (repo, persister) = persister(seeded);

        let report = persister.save(&[entry("title", "\"New\"")]).await;

        assert!(report.is_success());
        assert_eq!(report.written[0].mode, WriteMode::Updated);
        assert_eq!(repo.create_count(), 0);
        assert_eq!(repo.applied_update_count(), 1);
        assert_eq!(
            repo.get_calls(),
            vec![MockCall::Update {
                key: "hero_title".to_string(),
                applied: true
            }]
        );
        assert_eq!(repo.raw_value("hero_title").as_deref(), Some("\"New\""));
    }

    #[tokio::test]
    async fn test_failure_in_middle_does_not_stop_batch() {
        let (repo, persister) = persister(
            MockSettingRepository::new().with_fault("hero_f3", Fault::Transient),
        );
        let entries: Vec<BatchEntry> = (1..=5)
            .map(|i| entry(&format!("f{i}"), &format!("\"v{i}\"")))
            .collect();

        let report = persister.save(&entries).await;

        assert_eq!(
            report.outcome,
            BatchOutcome::PartiallySucceeded {
                failed: vec!["f3".to_string()]
            }
        );
        assert_eq!(report.failed_fields(), vec!["f3"]);
        assert!(report.failures[0].error.contains("injected failure"));
        for i in [1, 2, 4, 5] {
            assert_eq!(
                repo.raw_value(&format!("hero_f{i}")),
                Some(format!("\"v{i}\""))
            );
        }
        assert_eq!(repo.raw_value("hero_f3"), None);

        // Writes were issued strictly in entry order.
        let touched: Vec<String> = repo
            .get_calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Update { key, .. } => Some(key),
                _ => None,
            })
            .collect();
        assert_eq!(touched, vec!["hero_f1", "hero_f2", "hero_f3", "hero_f4", "hero_f5"]);
    }

    #[tokio::test]
    async fn test_all_failing_is_total_failure() {
        let (_repo, persister) = persister(
            MockSettingRepository::new()
                .with_fault("hero_a", Fault::Transient)
                .with_fault("hero_b", Fault::Transient),
        );

        let report = persister.save(&[entry("a", "1"), entry("b", "2")]).await;

        assert_eq!(
            report.outcome,
            BatchOutcome::Failed {
                failed: vec!["a".to_string(), "b".to_string()]
            }
        );
        assert!(report.written.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_on_create_is_reported_not_retried() {
        let (repo, persister) = persister(
            MockSettingRepository::new().with_fault("hero_title", Fault::RaceOnCreate),
        );

        let report = persister
            .save(&[entry("title", "\"Mine\""), entry("subtitle", "\"Sub\"")])
            .await;

        assert_eq!(
            report.outcome,
            BatchOutcome::PartiallySucceeded {
                failed: vec!["title".to_string()]
            }
        );
        assert!(report.failures[0].error.contains("already exists"));
        let title_calls: Vec<MockCall> = repo
            .get_calls()
            .into_iter()
            .filter(|c| match c {
                MockCall::Create { key } | MockCall::Update { key, .. } => key == "hero_title",
                _ => false,
            })
            .collect();
        assert_eq!(
            title_calls,
            vec![
                MockCall::Update {
                    key: "hero_title".to_string(),
                    applied: false
                },
                MockCall::Create {
                    key: "hero_title".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let (repo, persister) = persister(MockSettingRepository::new());
        let report = persister.save(&[]).await;
        assert!(report.is_success());
        assert!(repo.get_calls().is_empty());
    }
}
