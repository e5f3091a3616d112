// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tg-engine: admission, concurrency limiting and job execution

pub mod admission;
mod error;
pub mod executor;
pub mod limiter;
pub mod scheduler;
pub mod store;

pub use admission::{Admission, AdmissionController};
pub use error::SchedulerError;
pub use executor::{executor_fn, ExecutorError, ExecutorRegistry, FnExecutor, JobExecutor};
pub use limiter::{ConcurrencyLimiter, Slot};
pub use scheduler::{JobFilter, KindStats, Scheduler};
pub use store::RecordStore;
