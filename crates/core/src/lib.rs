// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tg-core: data model shared by the Tollgate scheduler, wire protocol and daemon

pub mod macros;

pub mod clock;
pub mod id;
pub mod kind;
pub mod policy;
pub mod record;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{JobId, OwnerId};
pub use kind::{JobKind, UnknownJobKind};
pub use policy::{JobKindPolicy, PolicyError, PolicyOverride, PolicyTable};
pub use record::{JobError, JobRecord, JobState, TransitionError};
