// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory registry of job records with time-based eviction.
//!
//! The map lock is held only long enough to find, add or drop an entry. Each
//! record sits behind its own mutex, so a status poll on one job never waits
//! on a transition of another.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tg_core::{JobId, JobRecord};

#[derive(Default)]
pub struct RecordStore {
    records: RwLock<HashMap<JobId, Arc<Mutex<JobRecord>>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Returns false, leaving the store unchanged, if a record
    /// with the same id already exists.
    pub fn insert(&self, record: JobRecord) -> bool {
        let mut records = self.records.write();
        if records.contains_key(record.id()) {
            return false;
        }
        records.insert(record.id().clone(), Arc::new(Mutex::new(record)));
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.read().contains_key(id)
    }

    /// Snapshot of one record.
    pub fn get(&self, id: &str) -> Option<JobRecord> {
        let entry = self.entry(id)?;
        let record = entry.lock().clone();
        Some(record)
    }

    /// Atomic read-modify-write of one record. Returns `None` if the id is
    /// unknown.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut JobRecord) -> R) -> Option<R> {
        let entry = self.entry(id)?;
        let mut record = entry.lock();
        Some(f(&mut record))
    }

    /// Snapshot of every record, in no particular order.
    pub fn all(&self) -> Vec<JobRecord> {
        let entries: Vec<_> = self.records.read().values().cloned().collect();
        entries.iter().map(|e| e.lock().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Drop terminal records created more than `retention` before `now_ms`.
    ///
    /// Pending and running records are kept regardless of age. Returns the
    /// number of records removed.
    pub fn evict_older_than(&self, retention: Duration, now_ms: u64) -> usize {
        let retention_ms = retention.as_millis() as u64;
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, entry| {
            let record = entry.lock();
            !(record.is_terminal() && record.age_ms(now_ms) > retention_ms)
        });
        before - records.len()
    }

    fn entry(&self, id: &str) -> Option<Arc<Mutex<JobRecord>>> {
        self.records.read().get(id).cloned()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
