// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oh-core: Shared vocabulary for the offhours scheduler

pub mod macros;

pub mod clock;
pub mod service;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock, WallZone};
pub use service::ServiceRef;
pub use state::{ActualState, DesiredState};
