// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-kind scheduling policy, loaded once at startup and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::kind::{JobKind, UnknownJobKind};

/// Limits applied to every job of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobKindPolicy {
    /// Maximum jobs of this kind in `Running` at once.
    pub max_concurrent: usize,
    /// Hard limit on a single execution attempt.
    pub timeout: Duration,
    /// Minimum spacing between accepted submissions from one caller.
    pub min_interval: Duration,
    /// Carried through from configuration but never acted on: failed jobs
    /// are terminal and are not retried.
    pub max_retries: u32,
}

impl JobKindPolicy {
    crate::setters! {
        set {
            max_concurrent: usize,
            timeout: Duration,
            min_interval: Duration,
            max_retries: u32,
        }
    }
}

/// Partial policy as written in a config file. Unset fields keep the kind's
/// built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyOverride {
    pub max_concurrent: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub min_interval_ms: Option<u64>,
    pub max_retries: Option<u32>,
}

impl PolicyOverride {
    fn apply(&self, mut policy: JobKindPolicy) -> JobKindPolicy {
        if let Some(n) = self.max_concurrent {
            policy.max_concurrent = n;
        }
        if let Some(ms) = self.timeout_ms {
            policy.timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.min_interval_ms {
            policy.min_interval = Duration::from_millis(ms);
        }
        if let Some(n) = self.max_retries {
            policy.max_retries = n;
        }
        policy
    }
}

/// Errors from building a policy table.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error(transparent)]
    UnknownKind(#[from] UnknownJobKind),

    #[error("policy for {0}: max_concurrent must be at least 1")]
    ZeroConcurrency(JobKind),

    #[error("policy for {0}: timeout must be non-zero")]
    ZeroTimeout(JobKind),

    #[error("invalid policy file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Policy for every [`JobKind`].
///
/// Always complete: kinds without explicit configuration carry their
/// built-in default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    policies: HashMap<JobKind, JobKindPolicy>,
}

#[derive(Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policies: HashMap<String, PolicyOverride>,
}

impl PolicyTable {
    /// Create a table of built-in defaults.
    pub fn defaults() -> Self {
        Self { policies: JobKind::ALL.into_iter().map(|k| (k, k.default_policy())).collect() }
    }

    /// Create a table where every kind shares the same policy.
    pub fn uniform(policy: JobKindPolicy) -> Result<Self, PolicyError> {
        let table = Self { policies: JobKind::ALL.into_iter().map(|k| (k, policy)).collect() };
        table.validate()?;
        Ok(table)
    }

    /// Layer config-file overrides, keyed by kind name, over the defaults.
    pub fn with_overrides(overrides: &HashMap<String, PolicyOverride>) -> Result<Self, PolicyError> {
        let mut table = Self::defaults();
        for (name, over) in overrides {
            let kind: JobKind = name.parse()?;
            table.policies.insert(kind, over.apply(kind.default_policy()));
        }
        table.validate()?;
        Ok(table)
    }

    /// Parse the `[policies.<kind>]` tables of a TOML document.
    ///
    /// Other top-level tables are ignored so the same file can carry
    /// unrelated configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
        let file: PolicyFile = toml::from_str(content)?;
        Self::with_overrides(&file.policies)
    }

    /// Replace one kind's policy.
    pub fn with_policy(mut self, kind: JobKind, policy: JobKindPolicy) -> Result<Self, PolicyError> {
        self.policies.insert(kind, policy);
        self.validate()?;
        Ok(self)
    }

    pub fn get(&self, kind: JobKind) -> JobKindPolicy {
        self.policies.get(&kind).copied().unwrap_or_else(|| kind.default_policy())
    }

    pub fn iter(&self) -> impl Iterator<Item = (JobKind, JobKindPolicy)> + '_ {
        JobKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    fn validate(&self) -> Result<(), PolicyError> {
        for (kind, policy) in self.iter() {
            if policy.max_concurrent == 0 {
                return Err(PolicyError::ZeroConcurrency(kind));
            }
            if policy.timeout.is_zero() {
                return Err(PolicyError::ZeroTimeout(kind));
            }
        }
        Ok(())
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
