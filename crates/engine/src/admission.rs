// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-caller submission throttle.
//!
//! A fixed window per `(owner, kind)`: a caller may have at most one job of a
//! kind accepted per `min_interval`. Only accepted submissions move the
//! window; denied attempts leave it untouched.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tg_core::{JobKind, OwnerId, PolicyTable};

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// `retry_after` is rounded up to whole seconds.
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

struct KindWindow {
    min_interval: Duration,
    last_accepted: Mutex<HashMap<OwnerId, Instant>>,
}

/// Decides whether a caller may submit another job of a kind right now.
///
/// Each kind has its own lock, so throttling one kind never waits on another.
pub struct AdmissionController {
    windows: HashMap<JobKind, KindWindow>,
}

impl AdmissionController {
    pub fn new(policies: &PolicyTable) -> Self {
        let windows = policies
            .iter()
            .map(|(kind, policy)| {
                let window = KindWindow {
                    min_interval: policy.min_interval,
                    last_accepted: Mutex::new(HashMap::new()),
                };
                (kind, window)
            })
            .collect();
        Self { windows }
    }

    /// Check the caller's window and, when allowed, record `now` as the last
    /// accepted submission. Check and record happen under one lock.
    pub fn check_and_record(&self, owner: &OwnerId, kind: JobKind, now: Instant) -> Admission {
        let Some(window) = self.windows.get(&kind) else {
            return Admission::Allowed;
        };

        let mut last_accepted = window.last_accepted.lock();
        let previous = last_accepted.get(owner).copied();
        if let Some(previous) = previous {
            let elapsed = now.saturating_duration_since(previous);
            if elapsed < window.min_interval {
                return Admission::Denied {
                    retry_after: round_up_to_secs(window.min_interval - elapsed),
                };
            }
        }

        // Never move the window backwards when a caller's clock reading lost a
        // race with a later one.
        let recorded = previous.map_or(now, |p| p.max(now));
        last_accepted.insert(owner.clone(), recorded);
        Admission::Allowed
    }

    /// Forget callers whose last accepted submission is older than `retention`.
    /// Entries still inside their kind's interval are kept whatever
    /// `retention` says. Returns the number of entries removed.
    pub fn prune(&self, retention: Duration, now: Instant) -> usize {
        let mut removed = 0;
        for window in self.windows.values() {
            let keep_for = retention.max(window.min_interval);
            let mut last_accepted = window.last_accepted.lock();
            let before = last_accepted.len();
            last_accepted.retain(|_, at| now.saturating_duration_since(*at) < keep_for);
            removed += before - last_accepted.len();
        }
        removed
    }

    /// Number of `(owner, kind)` pairs currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows.values().map(|w| w.last_accepted.lock().len()).sum()
    }
}

fn round_up_to_secs(d: Duration) -> Duration {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    Duration::from_secs(secs)
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
