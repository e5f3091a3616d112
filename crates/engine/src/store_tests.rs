// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tg_core::{JobError, JobKind, JobState, OwnerId};

const HOUR_MS: u64 = 60 * 60 * 1000;

fn record(id: &str, created_at_ms: u64) -> JobRecord {
    JobRecord::new(JobId::from(id), JobKind::PortScan, OwnerId::from("alice"), json!({}), created_at_ms)
}

fn store_with(id: &str, created_at_ms: u64, state: JobState) -> RecordStore {
    let store = RecordStore::new();
    store.insert(record(id, created_at_ms));
    store.update(id, |r| match state {
        JobState::Pending => {}
        JobState::Running => {
            r.start(created_at_ms).unwrap();
        }
        JobState::Completed => {
            r.start(created_at_ms).unwrap();
            r.complete(json!("ok"), created_at_ms).unwrap();
        }
        JobState::Failed => {
            r.start(created_at_ms).unwrap();
            r.fail(JobError::execution_failed("boom"), created_at_ms).unwrap();
        }
    });
    store
}

#[test]
fn insert_and_get() {
    let store = RecordStore::new();
    assert!(store.is_empty());
    assert!(store.insert(record("job-a", 0)));
    assert!(store.contains("job-a"));
    assert_eq!(store.len(), 1);

    let got = store.get("job-a").unwrap();
    assert_eq!(got.id(), "job-a");
    assert_eq!(got.state(), JobState::Pending);
    assert!(store.get("job-missing").is_none());
}

#[test]
fn duplicate_insert_is_rejected() {
    let store = RecordStore::new();
    assert!(store.insert(record("job-a", 0)));
    assert!(!store.insert(record("job-a", 5)));
    assert_eq!(store.get("job-a").unwrap().created_at_ms(), 0);
}

#[test]
fn update_mutates_in_place() {
    let store = RecordStore::new();
    store.insert(record("job-a", 0));

    let payload = store.update("job-a", |r| r.start(10)).unwrap().unwrap();
    assert_eq!(payload, json!({}));
    assert_eq!(store.get("job-a").unwrap().state(), JobState::Running);
}

#[test]
fn update_unknown_returns_none() {
    let store = RecordStore::new();
    assert!(store.update("job-nope", |r| r.state()).is_none());
}

#[test]
fn get_returns_a_snapshot() {
    let store = RecordStore::new();
    store.insert(record("job-a", 0));
    let snapshot = store.get("job-a").unwrap();
    store.update("job-a", |r| r.start(10)).unwrap().unwrap();
    assert_eq!(snapshot.state(), JobState::Pending);
}

#[test]
fn all_lists_every_record() {
    let store = RecordStore::new();
    store.insert(record("job-a", 0));
    store.insert(record("job-b", 1));
    let mut ids: Vec<_> = store.all().iter().map(|r| r.id().to_string()).collect();
    ids.sort();
    assert_eq!(ids, vec!["job-a", "job-b"]);
}

#[yare::parameterized(
    pending_old   = { JobState::Pending,   false },
    running_old   = { JobState::Running,   false },
    completed_old = { JobState::Completed, true },
    failed_old    = { JobState::Failed,    true },
)]
fn eviction_only_removes_old_terminal_records(state: JobState, evicted: bool) {
    let store = store_with("job-a", 0, state);
    let removed = store.evict_older_than(Duration::from_secs(24 * 3600), 25 * HOUR_MS);
    assert_eq!(removed, usize::from(evicted));
    assert_eq!(store.contains("job-a"), !evicted);
}

#[test]
fn eviction_keeps_recent_terminal_records() {
    let store = store_with("job-a", 0, JobState::Completed);
    assert_eq!(store.evict_older_than(Duration::from_secs(24 * 3600), 23 * HOUR_MS), 0);
    assert!(store.contains("job-a"));
}

#[test]
fn parallel_updates_on_different_records() {
    let store = Arc::new(RecordStore::new());
    for i in 0..8 {
        store.insert(record(&format!("job-{i}"), 0));
    }
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let id = format!("job-{i}");
                store.update(&id, |r| r.start(1)).unwrap().unwrap();
                store.update(&id, |r| r.complete(json!(i), 2)).unwrap().unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert!(store.all().iter().all(|r| r.state() == JobState::Completed));
}
