// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor that runs a configured external program for each job.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{json, Value};
use tg_core::JobKind;
use tg_engine::{ExecutorError, JobExecutor};

use crate::config::CommandSpec;
use crate::template;

pub struct CommandExecutor {
    kind: JobKind,
    spec: CommandSpec,
}

impl CommandExecutor {
    pub fn new(kind: JobKind, spec: CommandSpec) -> Self {
        Self { kind, spec }
    }

    /// Arguments with payload fields substituted.
    pub fn render_args(&self, payload: &Value) -> Vec<String> {
        let vars = template::payload_vars(payload);
        self.spec.args.iter().map(|arg| template::interpolate(arg, &vars)).collect()
    }
}

#[async_trait]
impl JobExecutor for CommandExecutor {
    async fn execute(&self, payload: Value) -> Result<Value, ExecutorError> {
        let program = &self.spec.program;
        let args = self.render_args(&payload);
        tracing::debug!(kind = %self.kind, %program, ?args, "running command");

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(&args)
            .envs(&self.spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The scheduler drops this future on timeout.
            .kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .map_err(|e| ExecutorError::new(format!("failed to run {program}: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            return Ok(json!({ "exit_code": 0, "stdout": stdout, "stderr": stderr }));
        }

        let detail = stderr.trim();
        let message = if !detail.is_empty() {
            detail.to_string()
        } else if let Some(code) = output.status.code() {
            format!("{program} exited with status {code}")
        } else {
            format!("{program} was terminated by a signal")
        };
        Err(ExecutorError::new(message))
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
