// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job executors and the static kind → executor registry

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tg_core::JobKind;
use thiserror::Error;

/// Error reported by an executor. Recorded verbatim on the failed job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecutorError {
    message: String,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ExecutorError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ExecutorError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<std::io::Error> for ExecutorError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Kind-specific unit of work.
///
/// The scheduler treats payload and result as opaque JSON. An executor may be
/// abandoned mid-flight when its job times out; it should not rely on running
/// to completion.
#[async_trait]
pub trait JobExecutor: Send + Sync + 'static {
    async fn execute(&self, payload: Value) -> Result<Value, ExecutorError>;
}

/// Adapts an async closure into a [`JobExecutor`].
pub struct FnExecutor<F>(F);

/// Wrap an async closure as an executor.
///
/// ```ignore
/// let echo = executor_fn(|payload| async move { Ok(payload) });
/// ```
pub fn executor_fn<F, Fut>(f: F) -> FnExecutor<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ExecutorError>> + Send + 'static,
{
    FnExecutor(f)
}

#[async_trait]
impl<F, Fut> JobExecutor for FnExecutor<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ExecutorError>> + Send + 'static,
{
    async fn execute(&self, payload: Value) -> Result<Value, ExecutorError> {
        (self.0)(payload).await
    }
}

/// Static binding of each kind to exactly one executor, built once at
/// startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    executors: HashMap<JobKind, Arc<dyn JobExecutor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `executor` to `kind`, replacing any earlier binding.
    pub fn register(self, kind: JobKind, executor: impl JobExecutor) -> Self {
        self.register_arc(kind, Arc::new(executor))
    }

    pub fn register_arc(mut self, kind: JobKind, executor: Arc<dyn JobExecutor>) -> Self {
        if self.executors.insert(kind, executor).is_some() {
            tracing::warn!(%kind, "executor registered twice, keeping the last one");
        }
        self
    }

    pub fn get(&self, kind: JobKind) -> Option<Arc<dyn JobExecutor>> {
        self.executors.get(&kind).cloned()
    }

    pub fn contains(&self, kind: JobKind) -> bool {
        self.executors.contains_key(&kind)
    }

    /// Registered kinds in [`JobKind::ALL`] order.
    pub fn kinds(&self) -> Vec<JobKind> {
        JobKind::ALL.into_iter().filter(|k| self.contains(*k)).collect()
    }
}

impl std::fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorRegistry").field("kinds", &self.kinds()).finish()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
