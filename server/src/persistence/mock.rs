//! In-memory [`SettingRepository`] that records every call, for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use settings::{SettingRecord, SettingWrite};

use super::traits::SettingRepository;
use super::{now_timestamp, PersistenceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListAll,
    GetByKey { key: String },
    Create { key: String },
    /// `applied` is false when the key did not exist.
    Update { key: String, applied: bool },
}

/// A failure injected for writes to one key.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Every write fails as if the database were unreachable.
    Transient,
    /// Update reports the key as missing but create finds it taken,
    /// as when a concurrent save created it in between.
    RaceOnCreate,
}

#[derive(Default)]
pub struct MockSettingRepository {
    rows: Mutex<BTreeMap<String, SettingRecord>>,
    next_id: Mutex<i64>,
    faults: Mutex<HashMap<String, Fault>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    call_log: Mutex<Vec<MockCall>>,
}

impl MockSettingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row without recording a call.
    pub fn with_row(self, write: SettingWrite) -> Self {
        self.insert(&write);
        self
    }

    pub fn with_fault(self, key: &str, fault: Fault) -> Self {
        self.faults.lock().unwrap().insert(key.to_string(), fault);
        self
    }

    /// Hold every update of `key` until `gate` is notified.
    pub fn with_gate(self, key: &str, gate: Arc<Notify>) -> Self {
        self.gates.lock().unwrap().insert(key.to_string(), gate);
        self
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn create_count(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|c| matches!(c, MockCall::Create { .. }))
            .count()
    }

    pub fn applied_update_count(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|c| matches!(c, MockCall::Update { applied: true, .. }))
            .count()
    }

    pub fn raw_value(&self, key: &str) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .get(key)
            .map(|r| r.raw_value.clone())
    }

    fn record(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }

    fn gate(&self, key: &str) -> Option<Arc<Notify>> {
        self.gates.lock().unwrap().get(key).cloned()
    }

    fn fault(&self, key: &str) -> Option<Fault> {
        self.faults.lock().unwrap().get(key).copied()
    }

    fn insert(&self, write: &SettingWrite) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.rows.lock().unwrap().insert(
            write.key.clone(),
            SettingRecord {
                id: *next_id,
                key: write.key.clone(),
                declared_type: write.declared_type,
                raw_value: write.raw_value.clone(),
                updated_at: now_timestamp(),
            },
        );
    }

    fn transient(key: &str) -> PersistenceError {
        PersistenceError::Io(std::io::Error::other(format!("injected failure for {key}")))
    }
}

impl SettingRepository for MockSettingRepository {
    async fn list_all(&self) -> Result<Vec<SettingRecord>, PersistenceError> {
        self.record(MockCall::ListAll);
        let mut rows: Vec<SettingRecord> = self.rows.lock().unwrap().values().cloned().collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn get_by_key(&self, key: &str) -> Result<SettingRecord, PersistenceError> {
        self.record(MockCall::GetByKey {
            key: key.to_string(),
        });
        self.rows
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound {
                key: key.to_string(),
            })
    }

    async fn create(&self, write: &SettingWrite) -> Result<(), PersistenceError> {
        self.record(MockCall::Create {
            key: write.key.clone(),
        });
        match self.fault(&write.key) {
            Some(Fault::Transient) => return Err(Self::transient(&write.key)),
            Some(Fault::RaceOnCreate) => {
                return Err(PersistenceError::DuplicateKey {
                    key: write.key.clone(),
                })
            }
            None => {}
        }
        if self.rows.lock().unwrap().contains_key(&write.key) {
            return Err(PersistenceError::DuplicateKey {
                key: write.key.clone(),
            });
        }
        self.insert(write);
        Ok(())
    }

    async fn update_by_key(&self, write: &SettingWrite) -> Result<(), PersistenceError> {
        if let Some(gate) = self.gate(&write.key) {
            gate.notified().await;
        }

        if let Some(Fault::Transient) = self.fault(&write.key) {
            self.record(MockCall::Update {
                key: write.key.clone(),
                applied: false,
            });
            return Err(Self::transient(&write.key));
        }

        let applied = !matches!(self.fault(&write.key), Some(Fault::RaceOnCreate))
            && match self.rows.lock().unwrap().get_mut(&write.key) {
                Some(row) => {
                    row.declared_type = write.declared_type;
                    row.raw_value = write.raw_value.clone();
                    row.updated_at = now_timestamp();
                    true
                }
                None => false,
            };

        self.record(MockCall::Update {
            key: write.key.clone(),
            applied,
        });

        if applied {
            Ok(())
        } else {
            Err(PersistenceError::NotFound {
                key: write.key.clone(),
            })
        }
    }
}
