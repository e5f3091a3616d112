// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DTO structs for the IPC protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tg_core::{JobError, JobKind, JobRecord, JobState};

/// Detailed job information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobDetail {
    pub id: String,
    pub kind: JobKind,
    pub owner: String,
    pub state: JobState,
    /// Present only while the job is still pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub created_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<JobErrorDetail>,
}

impl From<&JobRecord> for JobDetail {
    fn from(r: &JobRecord) -> Self {
        JobDetail {
            id: r.id().to_string(),
            kind: r.kind(),
            owner: r.owner().to_string(),
            state: r.state(),
            payload: r.payload().cloned(),
            created_at_ms: r.created_at_ms(),
            started_at_ms: r.started_at_ms(),
            completed_at_ms: r.completed_at_ms(),
            result: r.result().cloned(),
            error: r.error().map(JobErrorDetail::from),
        }
    }
}

/// Failure reason, flattened for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobErrorDetail {
    /// `timed_out` or `execution_failed`
    pub kind: String,
    pub message: String,
}

impl From<&JobError> for JobErrorDetail {
    fn from(e: &JobError) -> Self {
        let kind = match e {
            JobError::TimedOut { .. } => "timed_out",
            JobError::ExecutionFailed { .. } => "execution_failed",
        };
        JobErrorDetail { kind: kind.to_string(), message: e.to_string() }
    }
}

/// Load of one job kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindStatsDetail {
    pub kind: JobKind,
    pub pending: usize,
    pub running: usize,
    pub max_concurrent: usize,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
