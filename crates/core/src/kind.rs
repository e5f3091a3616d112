// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job kinds: the categories of long-running work the scheduler accepts.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::policy::JobKindPolicy;

/// Category of work. Each kind has its own concurrency, timeout and
/// rate-limit policy and is bound to exactly one executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    PortScan,
    SearchDork,
    CredentialLeakCheck,
    DirectoryEnumeration,
    SubdomainEnumeration,
    TechFingerprint,
}

impl JobKind {
    /// Every kind, in a stable order. Scheduling passes walk kinds in this order.
    pub const ALL: [JobKind; 6] = [
        JobKind::PortScan,
        JobKind::SearchDork,
        JobKind::CredentialLeakCheck,
        JobKind::DirectoryEnumeration,
        JobKind::SubdomainEnumeration,
        JobKind::TechFingerprint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::PortScan => "port_scan",
            JobKind::SearchDork => "search_dork",
            JobKind::CredentialLeakCheck => "credential_leak_check",
            JobKind::DirectoryEnumeration => "directory_enumeration",
            JobKind::SubdomainEnumeration => "subdomain_enumeration",
            JobKind::TechFingerprint => "tech_fingerprint",
        }
    }

    /// Built-in policy used when configuration does not override the kind.
    pub fn default_policy(&self) -> JobKindPolicy {
        let (max_concurrent, timeout_secs, min_interval_secs, max_retries) = match self {
            JobKind::PortScan => (2, 300, 60, 0),
            JobKind::SearchDork => (3, 120, 30, 2),
            JobKind::CredentialLeakCheck => (4, 60, 10, 2),
            JobKind::DirectoryEnumeration => (2, 600, 120, 1),
            JobKind::SubdomainEnumeration => (3, 300, 60, 1),
            JobKind::TechFingerprint => (5, 60, 5, 1),
        };
        JobKindPolicy {
            max_concurrent,
            timeout: Duration::from_secs(timeout_secs),
            min_interval: Duration::from_secs(min_interval_secs),
            max_retries,
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a kind name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job kind '{0}'")]
pub struct UnknownJobKind(pub String);

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownJobKind(s.to_string()))
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
