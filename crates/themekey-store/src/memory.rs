//! # In-Memory Record Store
//!
//! Thread-safe, cloneable in-memory implementation of [`RecordStore`].
//! Backs the service binary when no external table is configured, and
//! every test suite in the workspace.
//!
//! All lock operations are synchronous (`parking_lot`, not `tokio::sync`)
//! because the lock is never held across `.await` points.
//! `parking_lot::RwLock` is non-poisonable — a panicking writer does not
//! permanently corrupt the store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use themekey_core::LicenseKey;
use themekey_state::LicenseRecord;

use crate::{RecordStore, StoreError};

/// In-memory key-indexed license table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<LicenseKey, LicenseRecord>>>,
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records` (test seeding).
    pub fn seeded(records: impl IntoIterator<Item = LicenseRecord>) -> Self {
        let data = records
            .into_iter()
            .map(|r| (r.key.clone(), r))
            .collect::<HashMap<_, _>>();
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_by_key(&self, key: &LicenseKey) -> Result<Option<LicenseRecord>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn insert(&self, record: LicenseRecord) -> Result<(), StoreError> {
        let mut guard = self.data.write();
        if guard.contains_key(&record.key) {
            return Err(StoreError::DuplicateKey(record.key));
        }
        guard.insert(record.key.clone(), record);
        Ok(())
    }

    async fn write(&self, record: &LicenseRecord) -> Result<(), StoreError> {
        self.data
            .write()
            .insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn existing_keys(&self) -> Result<HashSet<LicenseKey>, StoreError> {
        Ok(self.data.read().keys().cloned().collect())
    }
}
