// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-kind concurrency cap.
//!
//! Each kind has its own atomic running counter; acquiring never blocks. A
//! caller that cannot get a slot leaves its job pending for the next
//! scheduling pass.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tg_core::{JobKind, PolicyTable};

struct KindSlots {
    max: usize,
    running: AtomicUsize,
}

/// Bounds how many jobs of each kind execute at once.
///
/// Cheap to clone; clones share counters.
#[derive(Clone)]
pub struct ConcurrencyLimiter {
    kinds: Arc<HashMap<JobKind, KindSlots>>,
}

impl ConcurrencyLimiter {
    pub fn new(policies: &PolicyTable) -> Self {
        let kinds = policies
            .iter()
            .map(|(kind, policy)| {
                (kind, KindSlots { max: policy.max_concurrent, running: AtomicUsize::new(0) })
            })
            .collect();
        Self { kinds: Arc::new(kinds) }
    }

    /// Take a slot iff the kind is below its cap. Never waits.
    pub fn try_acquire(&self, kind: JobKind) -> bool {
        let Some(slots) = self.kinds.get(&kind) else {
            return false;
        };
        slots
            .running
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < slots.max).then_some(n + 1))
            .is_ok()
    }

    /// Return a slot taken with [`try_acquire`](Self::try_acquire).
    pub fn release(&self, kind: JobKind) {
        let Some(slots) = self.kinds.get(&kind) else {
            return;
        };
        let released =
            slots.running.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if released.is_err() {
            tracing::error!(%kind, "concurrency slot released without a matching acquire");
        }
    }

    /// Scoped acquisition: the returned [`Slot`] releases on drop, on every
    /// exit path.
    pub fn try_slot(&self, kind: JobKind) -> Option<Slot> {
        self.try_acquire(kind).then(|| Slot { limiter: self.clone(), kind })
    }

    pub fn running(&self, kind: JobKind) -> usize {
        self.kinds.get(&kind).map_or(0, |s| s.running.load(Ordering::Acquire))
    }

    pub fn capacity(&self, kind: JobKind) -> usize {
        self.kinds.get(&kind).map_or(0, |s| s.max)
    }
}

/// A held concurrency slot. Dropping it releases the slot.
#[must_use = "dropping a Slot releases it immediately"]
pub struct Slot {
    limiter: ConcurrencyLimiter,
    kind: JobKind,
}

impl Slot {
    pub fn kind(&self) -> JobKind {
        self.kind
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.limiter.release(self.kind);
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
#[path = "limiter_tests.rs"]
mod tests;
