// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oh-engine: Reconciliation of scheduled service state

pub mod action;
pub mod decision;
pub mod env;
mod executor;
pub mod fetcher;
pub mod logging;
mod reconcile;
pub mod report;

pub use action::Action;
pub use decision::{decide, effective_count, Decision, SkipReason};
pub use env::{Settings, SettingsError};
pub use executor::{ExecuteError, Executor};
pub use fetcher::{FetchedPlans, PlanFetcher};
pub use reconcile::{PlanExecutor, ReconcileOutcome, ReconcileSummary, SetupError};
pub use report::{scale_hint, ScaleHint, ScheduleView, ServiceStatusRow, StatusView};
