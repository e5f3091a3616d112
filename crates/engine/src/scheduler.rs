// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job admission, dispatch and lifecycle tracking.
//!
//! A scheduling pass runs after every accepted submission and after every
//! finished execution; there is no polling loop. A pass walks every kind and
//! promotes pending jobs, oldest first, while the kind has free capacity.
//!
//! Each promoted job runs in its own task, raced against the kind's timeout.
//! The executor itself runs in a further task so a panic is contained and a
//! timed-out executor can be aborted.

use parking_lot::Mutex;
use serde_json::Value;
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tg_core::{
    Clock, JobError, JobId, JobKind, JobRecord, JobState, OwnerId, PolicyTable, SystemClock,
};
use tracing::{debug, info, warn};

use crate::admission::{Admission, AdmissionController};
use crate::error::SchedulerError;
use crate::executor::{ExecutorRegistry, JobExecutor};
use crate::limiter::{ConcurrencyLimiter, Slot};
use crate::store::RecordStore;

/// Narrowing for [`Scheduler::list`]. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub state: Option<JobState>,
    pub kind: Option<JobKind>,
}

impl JobFilter {
    fn matches(&self, record: &JobRecord) -> bool {
        self.state.map_or(true, |s| s == record.state())
            && self.kind.map_or(true, |k| k == record.kind())
    }
}

/// Point-in-time load of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindStats {
    pub kind: JobKind,
    pub pending: usize,
    pub running: usize,
    pub max_concurrent: usize,
}

struct Inner<C> {
    policies: PolicyTable,
    admission: AdmissionController,
    limiter: ConcurrencyLimiter,
    store: RecordStore,
    executors: ExecutorRegistry,
    /// FIFO of pending job ids, one queue per kind.
    pending: HashMap<JobKind, Mutex<VecDeque<JobId>>>,
    clock: C,
}

/// Handle to the scheduler. Cheap to clone; construct once at startup and
/// hand clones to whatever accepts requests.
///
/// `submit` spawns execution tasks and must be called from within a tokio
/// runtime.
pub struct Scheduler<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> Clone for Scheduler<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl Scheduler<SystemClock> {
    pub fn new(policies: PolicyTable, executors: ExecutorRegistry) -> Self {
        Self::with_clock(policies, executors, SystemClock)
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(policies: PolicyTable, executors: ExecutorRegistry, clock: C) -> Self {
        let pending = JobKind::ALL.into_iter().map(|k| (k, Mutex::new(VecDeque::new()))).collect();
        Self {
            inner: Arc::new(Inner {
                admission: AdmissionController::new(&policies),
                limiter: ConcurrencyLimiter::new(&policies),
                store: RecordStore::new(),
                policies,
                executors,
                pending,
                clock,
            }),
        }
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.inner.policies
    }

    pub fn executors(&self) -> &ExecutorRegistry {
        &self.inner.executors
    }

    /// Accept a job for `owner`, or refuse it.
    ///
    /// Returns as soon as the job is recorded as pending; a scheduling pass
    /// may start it before this returns, but never waits for it to run.
    pub fn submit(
        &self,
        owner: impl Into<OwnerId>,
        kind: JobKind,
        payload: Value,
    ) -> Result<JobId, SchedulerError> {
        let owner = owner.into();

        // Checked before admission so a misconfigured kind doesn't burn the
        // caller's window.
        if !self.inner.executors.contains(kind) {
            return Err(SchedulerError::NoExecutor(kind));
        }

        if let Admission::Denied { retry_after } =
            self.inner.admission.check_and_record(&owner, kind, self.inner.clock.now())
        {
            debug!(%owner, %kind, retry_after_secs = retry_after.as_secs(), "submission rate limited");
            return Err(SchedulerError::RateLimited { kind, retry_after });
        }

        // Creation time is stamped under the queue lock so queue order and
        // `created_at` order agree across concurrent submitters.
        let id = {
            let mut queue = self
                .inner
                .pending
                .get(&kind)
                .ok_or(SchedulerError::NoExecutor(kind))?
                .lock();
            let id = self.fresh_id();
            let record =
                JobRecord::new(id.clone(), kind, owner.clone(), payload, self.inner.clock.epoch_ms());
            let inserted = self.inner.store.insert(record);
            debug_assert!(inserted, "fresh job id collided");
            queue.push_back(id.clone());
            id
        };
        info!(job_id = %id, %owner, %kind, "job accepted");

        self.dispatch();
        Ok(id)
    }

    /// Current view of a job. Never mutates anything.
    pub fn status(&self, id: &str) -> Result<JobRecord, SchedulerError> {
        self.inner.store.get(id).ok_or_else(|| SchedulerError::NotFound(JobId::from(id)))
    }

    /// Records matching `filter`, newest first.
    pub fn list(&self, filter: &JobFilter) -> Vec<JobRecord> {
        let mut records: Vec<_> =
            self.inner.store.all().into_iter().filter(|r| filter.matches(r)).collect();
        records.sort_by(|a, b| b.created_at_ms().cmp(&a.created_at_ms()));
        records
    }

    /// Pending and running counts for every kind.
    pub fn stats(&self) -> Vec<KindStats> {
        JobKind::ALL
            .into_iter()
            .map(|kind| KindStats {
                kind,
                pending: self.inner.pending.get(&kind).map_or(0, |q| q.lock().len()),
                running: self.inner.limiter.running(kind),
                max_concurrent: self.inner.limiter.capacity(kind),
            })
            .collect()
    }

    /// Evict finished records created more than `retention` ago. Returns the
    /// number evicted.
    pub fn evict_expired(&self, retention: Duration) -> usize {
        self.inner.store.evict_older_than(retention, self.inner.clock.epoch_ms())
    }

    /// Forget rate-limit windows older than `retention`. Returns the number
    /// of entries dropped.
    pub fn prune_admission(&self, retention: Duration) -> usize {
        self.inner.admission.prune(retention, self.inner.clock.now())
    }

    fn fresh_id(&self) -> JobId {
        loop {
            let id = JobId::new();
            if !self.inner.store.contains(id.as_str()) {
                return id;
            }
        }
    }

    /// One scheduling pass over every kind.
    fn dispatch(&self) {
        for kind in JobKind::ALL {
            while let Some((id, slot)) = self.claim_next(kind) {
                self.start(id, slot);
            }
        }
    }

    /// Pop the oldest pending job of `kind` if a slot is free.
    ///
    /// The slot is only taken when there is a job to give it to, and both
    /// happen under the kind's queue lock.
    fn claim_next(&self, kind: JobKind) -> Option<(JobId, Slot)> {
        let mut queue = self.inner.pending.get(&kind)?.lock();
        if queue.is_empty() {
            return None;
        }
        let slot = self.inner.limiter.try_slot(kind)?;
        let id = queue.pop_front()?;
        Some((id, slot))
    }

    fn start(&self, id: JobId, slot: Slot) {
        let kind = slot.kind();
        let now = self.inner.clock.epoch_ms();
        let payload = match self.inner.store.update(id.as_str(), |r| r.start(now)) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                warn!(error = %e, "skipping job that is no longer pending");
                return;
            }
            None => {
                warn!(job_id = %id, "pending job missing from store");
                return;
            }
        };
        info!(job_id = %id, %kind, "job started");

        let executor = self.inner.executors.get(kind);
        let timeout = self.inner.policies.get(kind).timeout;
        let this = self.clone();
        tokio::spawn(async move {
            let outcome = match executor {
                Some(executor) => run_with_timeout(executor, payload, timeout).await,
                None => Err(JobError::execution_failed(format!("no executor registered for {kind}"))),
            };
            this.finish(&id, kind, outcome);
            drop(slot);
            this.dispatch();
        });
    }

    fn finish(&self, id: &JobId, kind: JobKind, outcome: Result<Value, JobError>) {
        let now = self.inner.clock.epoch_ms();
        let started = self.inner.store.get(id.as_str()).and_then(|r| r.started_at_ms());
        let elapsed_ms = started.map(|s| now.saturating_sub(s));

        let applied = self.inner.store.update(id.as_str(), |r| match outcome {
            Ok(result) => r.complete(result, now).map(|()| None),
            Err(error) => r.fail(error.clone(), now).map(|()| Some(error)),
        });

        match applied {
            Some(Ok(None)) => info!(job_id = %id, %kind, ?elapsed_ms, "job completed"),
            Some(Ok(Some(error))) if error.is_timeout() => {
                warn!(job_id = %id, %kind, ?elapsed_ms, "job timed out")
            }
            Some(Ok(Some(error))) => {
                warn!(job_id = %id, %kind, ?elapsed_ms, error = %error, "job failed")
            }
            Some(Err(e)) => warn!(error = %e, "dropping outcome for job already finished"),
            None => warn!(job_id = %id, "running job missing from store"),
        }
    }
}

/// Run `executor` in its own task, racing it against `timeout`.
///
/// On timeout the task is aborted, which only takes effect at the
/// executor's next await point; its result is discarded either way.
async fn run_with_timeout(
    executor: Arc<dyn JobExecutor>,
    payload: Value,
    timeout: Duration,
) -> Result<Value, JobError> {
    let mut task = tokio::spawn(async move { executor.execute(payload).await });
    match tokio::time::timeout(timeout, &mut task).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(e))) => Err(JobError::execution_failed(e.message())),
        Ok(Err(join)) if join.is_panic() => Err(JobError::execution_failed(format!(
            "executor panicked: {}",
            panic_message(join.into_panic())
        ))),
        Ok(Err(_)) => Err(JobError::execution_failed("executor task was cancelled")),
        Err(_) => {
            task.abort();
            Err(JobError::timed_out(timeout))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
