// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and its forward-only state machine.
//!
//! ```text
//! Pending ──start──▶ Running ──complete──▶ Completed
//!                       └─────fail──────▶ Failed
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::id::{JobId, OwnerId};
use crate::kind::JobKind;

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

crate::simple_display! {
    JobState {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Why a job ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobError {
    /// The attempt ran past the kind's timeout. The executor may still be
    /// running in the background; its eventual result is discarded.
    #[error("timed out after {after_ms}ms")]
    TimedOut { after_ms: u64 },

    /// The executor reported an error (or panicked).
    #[error("{message}")]
    ExecutionFailed { message: String },
}

impl JobError {
    pub fn timed_out(after: Duration) -> Self {
        JobError::TimedOut { after_ms: after.as_millis() as u64 }
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        JobError::ExecutionFailed { message: message.into() }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, JobError::TimedOut { .. })
    }
}

/// Attempted a state change the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("job {id}: cannot move from {from} to {to}")]
pub struct TransitionError {
    pub id: JobId,
    pub from: JobState,
    pub to: JobState,
}

/// One submitted unit of work.
///
/// Fields are private so that state, timestamps and outcome can only change
/// through [`start`](Self::start), [`complete`](Self::complete) and
/// [`fail`](Self::fail).
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    id: JobId,
    kind: JobKind,
    owner: OwnerId,
    /// Present until the job starts; moved into the executor at that point.
    payload: Option<Value>,
    state: JobState,
    created_at_ms: u64,
    started_at_ms: Option<u64>,
    completed_at_ms: Option<u64>,
    result: Option<Value>,
    error: Option<JobError>,
}

impl JobRecord {
    /// Create a `Pending` record.
    pub fn new(id: JobId, kind: JobKind, owner: OwnerId, payload: Value, created_at_ms: u64) -> Self {
        Self {
            id,
            kind,
            owner,
            payload: Some(payload),
            state: JobState::Pending,
            created_at_ms,
            started_at_ms: None,
            completed_at_ms: None,
            result: None,
            error: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Payload still held by the record; `None` once the job has started.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn completed_at_ms(&self) -> Option<u64> {
        self.completed_at_ms
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&JobError> {
        self.error.as_ref()
    }

    /// Milliseconds since creation, saturating at zero for clock skew.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }

    /// `Pending → Running`. Stamps `started_at` and hands the payload over to
    /// the caller, which passes it on to the executor.
    pub fn start(&mut self, now_ms: u64) -> Result<Value, TransitionError> {
        self.expect_state(JobState::Pending, JobState::Running)?;
        self.state = JobState::Running;
        self.started_at_ms = Some(now_ms);
        Ok(self.payload.take().unwrap_or(Value::Null))
    }

    /// `Running → Completed`, storing the executor's result.
    pub fn complete(&mut self, result: Value, now_ms: u64) -> Result<(), TransitionError> {
        self.expect_state(JobState::Running, JobState::Completed)?;
        self.state = JobState::Completed;
        self.completed_at_ms = Some(now_ms);
        self.result = Some(result);
        Ok(())
    }

    /// `Running → Failed`, storing the failure.
    pub fn fail(&mut self, error: JobError, now_ms: u64) -> Result<(), TransitionError> {
        self.expect_state(JobState::Running, JobState::Failed)?;
        self.state = JobState::Failed;
        self.completed_at_ms = Some(now_ms);
        self.error = Some(error);
        Ok(())
    }

    fn expect_state(&self, from: JobState, to: JobState) -> Result<(), TransitionError> {
        if self.state == from {
            Ok(())
        } else {
            Err(TransitionError { id: self.id.clone(), from: self.state, to })
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
