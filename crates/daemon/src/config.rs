// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy and executor configuration file.
//!
//! ```toml
//! [policies.port_scan]
//! max_concurrent = 4
//! timeout_ms = 600000
//!
//! [executors.port_scan]
//! program = "nmap"
//! args = ["-Pn", "-p", "${ports}", "${target}"]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tg_core::{JobKind, PolicyError, PolicyOverride, PolicyTable, UnknownJobKind};
use tg_engine::ExecutorRegistry;
use thiserror::Error;

use crate::command::CommandExecutor;

/// How to run one kind's jobs as an external program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Parsed contents of `tollgate.toml`. Both tables are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub policies: HashMap<String, PolicyOverride>,
    #[serde(default)]
    pub executors: HashMap<String, CommandSpec>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid config {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("executor: {0}")]
    UnknownKind(#[from] UnknownJobKind),

    #[error("executor for {0}: program must not be empty")]
    EmptyProgram(JobKind),
}

impl ConfigFile {
    /// Load from `path`. A missing file yields the empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Read(path.to_path_buf(), e)),
        };
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Built-in defaults with this file's overrides applied.
    pub fn policies(&self) -> Result<PolicyTable, ConfigError> {
        Ok(PolicyTable::with_overrides(&self.policies)?)
    }

    /// A command executor for every `[executors.<kind>]` table.
    pub fn executors(&self) -> Result<ExecutorRegistry, ConfigError> {
        let mut registry = ExecutorRegistry::new();
        for (name, spec) in &self.executors {
            let kind: JobKind = name.parse()?;
            if spec.program.trim().is_empty() {
                return Err(ConfigError::EmptyProgram(kind));
            }
            registry = registry.register(kind, CommandExecutor::new(kind, spec.clone()));
        }
        Ok(registry)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
