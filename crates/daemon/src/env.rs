// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: TG_STATE_DIR > XDG state dir/tollgate > ~/.local/state/tollgate
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("TG_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(state) = dirs::state_dir() {
        return Ok(state.join("tollgate"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/tollgate"))
}

/// Policy/executor config file: TG_CONFIG > `<state_dir>/tollgate.toml`
pub fn config_path(state_dir: &Path) -> PathBuf {
    std::env::var("TG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir.join("tollgate.toml"))
}

/// Default IPC timeout
pub fn ipc_timeout() -> Result<Duration, LifecycleError> {
    millis_var("TG_IPC_TIMEOUT_MS", Duration::from_secs(5))
}

/// How often old records are evicted (default 10 minutes)
pub fn evict_interval() -> Result<Duration, LifecycleError> {
    millis_var("TG_EVICT_INTERVAL_MS", Duration::from_secs(10 * 60))
}

/// How long finished records are kept (default 24 hours)
pub fn retention() -> Duration {
    std::env::var("TG_RETENTION_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(24 * 60 * 60))
}

fn millis_var(name: &'static str, default: Duration) -> Result<Duration, LifecycleError> {
    parse_millis(name, std::env::var(name).ok().as_deref(), default)
}

/// A positive millisecond count, or `default` when unset. Zero is rejected:
/// every millisecond setting is used as a period or deadline.
pub(crate) fn parse_millis(
    name: &'static str,
    value: Option<&str>,
    default: Duration,
) -> Result<Duration, LifecycleError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(LifecycleError::InvalidEnv { name, value: raw.to_string() }),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
