// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters for the remote resource manager

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod resource;
pub mod timeout;

pub use resource::{ResourceError, ResourceManager, ServiceStatus, TaskRef};
pub use timeout::TimeoutResourceManager;

#[cfg(any(test, feature = "test-support"))]
pub use resource::{FakeResourceManager, ResourceCall};
