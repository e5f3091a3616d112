// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic eviction of finished records and stale rate-limit windows.

use std::time::Duration;

use tg_core::Clock;
use tg_engine::Scheduler;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct Housekeeping<C: Clock> {
    scheduler: Scheduler<C>,
    interval: Duration,
    retention: Duration,
}

/// What one sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sweep {
    pub evicted: usize,
    pub pruned: usize,
}

impl<C: Clock> Housekeeping<C> {
    pub fn new(scheduler: Scheduler<C>, interval: Duration, retention: Duration) -> Self {
        Self { scheduler, interval, retention }
    }

    /// Run one pass now.
    pub fn sweep(&self) -> Sweep {
        let sweep = Sweep {
            evicted: self.scheduler.evict_expired(self.retention),
            pruned: self.scheduler.prune_admission(self.retention),
        };
        if sweep.evicted > 0 || sweep.pruned > 0 {
            info!(evicted = sweep.evicted, pruned = sweep.pruned, "housekeeping sweep");
        } else {
            debug!("housekeeping sweep: nothing to remove");
        }
        sweep
    }

    /// Sweep every `interval` until `cancel` fires. The first sweep happens
    /// one interval after start.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.interval,
            self.interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("housekeeping stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.sweep();
                }
            }
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}

#[cfg(test)]
#[path = "housekeeping_tests.rs"]
mod tests;
