// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tg_engine::Scheduler;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::env;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/tollgate)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Directory for the rolling daemon log
    pub log_dir: PathBuf,
    /// Policy/executor TOML file
    pub config_path: PathBuf,
    /// Read/write deadline for one IPC message
    pub ipc_timeout: Duration,
    /// How often the housekeeping sweep runs
    pub evict_interval: Duration,
    /// How long finished records are kept
    pub retention: Duration,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        let mut config = Self::for_state_dir(state_dir);
        config.config_path = env::config_path(&config.state_dir);
        config.ipc_timeout = env::ipc_timeout()?;
        config.evict_interval = env::evict_interval()?;
        config.retention = env::retention();
        Ok(config)
    }

    /// Fixed layout under `state_dir` with default timings.
    pub fn for_state_dir(state_dir: PathBuf) -> Self {
        Self {
            socket_path: state_dir.join("tollgate.sock"),
            lock_path: state_dir.join("tgd.pid"),
            log_dir: state_dir.join("logs"),
            config_path: state_dir.join("tollgate.toml"),
            ipc_timeout: Duration::from_secs(5),
            evict_interval: Duration::from_secs(10 * 60),
            retention: Duration::from_secs(24 * 60 * 60),
            state_dir,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Shared with the listener and housekeeping tasks
    pub scheduler: Scheduler,
    /// When daemon started
    pub start_time: Instant,
}

/// Result of daemon startup: the daemon state and the bound listener.
pub struct StartupResult {
    pub daemon: DaemonState,
    /// The Unix socket listener to spawn as a task
    pub listener: UnixListener,
}

impl DaemonState {
    /// Remove the socket and PID file. In-flight jobs are abandoned with the
    /// process; nothing is persisted.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        let running: usize = self.scheduler.stats().iter().map(|k| k.running).sum();
        if running > 0 {
            warn!(running, "abandoning running jobs");
        }

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // Lock is released when self.lock_file is dropped

        info!(uptime_secs = self.start_time.elapsed().as_secs(), "Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Invalid {name}={value:?}: expected a positive number of milliseconds")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
