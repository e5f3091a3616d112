// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tg_core::{JobKind, JobState};

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Submit a job on behalf of `owner`
    Submit {
        owner: String,
        kind: JobKind,
        #[serde(default)]
        payload: Value,
    },

    /// Current state of one job
    Status { id: String },

    /// List jobs, newest first
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<JobState>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<JobKind>,
    },

    /// Per-kind pending/running counts
    Stats,

    /// Request daemon shutdown
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
