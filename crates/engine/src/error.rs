// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors returned synchronously from submit and status calls

use std::time::Duration;
use tg_core::{JobId, JobKind};
use thiserror::Error;

/// Errors from the scheduler's caller-facing operations.
///
/// None of these indicate a fault: each is an expected answer the inbound
/// layer turns into a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("rate limited for {kind}: retry after {}s", retry_after.as_secs())]
    RateLimited { kind: JobKind, retry_after: Duration },

    #[error("no executor registered for {0}")]
    NoExecutor(JobKind),

    #[error("job not found: {0}")]
    NotFound(JobId),
}

impl SchedulerError {
    /// Seconds to wait before resubmitting, for rate-limited submissions.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            SchedulerError::RateLimited { retry_after, .. } => Some(retry_after.as_secs()),
            _ => None,
        }
    }
}
