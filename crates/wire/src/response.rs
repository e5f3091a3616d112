// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

use super::{JobDetail, KindStatsDetail};

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Job accepted and queued
    Submitted { job_id: String },

    /// Submission refused; resubmit after the given number of seconds
    RateLimited { retry_after_secs: u64 },

    /// Single job details
    Job { job: Box<JobDetail> },

    /// List of jobs
    Jobs { jobs: Vec<JobDetail> },

    /// Per-kind load
    Stats { kinds: Vec<KindStatsDetail> },

    /// No job with this id (never existed or already evicted)
    NotFound { id: String },

    /// Error response
    Error { message: String },

    /// Daemon is shutting down
    ShuttingDown,
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
