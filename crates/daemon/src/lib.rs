// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tollgate daemon library
//!
//! Everything `tgd` runs, exposed so integration code can embed the daemon
//! or drive its pieces directly.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod command;
pub mod config;
pub mod env;
pub mod housekeeping;
pub mod lifecycle;
pub mod listener;
pub mod logging;
pub mod template;

pub use command::CommandExecutor;
pub use config::{CommandSpec, ConfigError, ConfigFile};
pub use housekeeping::{Housekeeping, Sweep};
pub use lifecycle::{startup, Config, DaemonState, LifecycleError, StartupResult};
pub use listener::{ListenCtx, Listener};
