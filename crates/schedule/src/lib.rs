// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oh-schedule: Schedule DSL, service plans and the weekly occurrence table

mod cron;
mod error;
mod loader;
mod query;
mod reference;
mod service_plan;
mod state_change;
mod week_plan;

pub use cron::{parse_cron_spec, CronSpec};
pub use error::ParseError;
pub use loader::{load_service_plans, parse_plan_records, Format, LoadError, PlanRecord};
pub use query::{ScheduledEvent, MINUTES_PER_WEEK};
pub use reference::{is_reference, reference_target, resolve_reference, Resolution};
pub use service_plan::ServicePlan;
pub use state_change::{parse_state_changes, ParseWarning, ParsedSchedule, StateChange};
pub use week_plan::{weekday_of, DayPlan, TimePlan, WeekPlan, DAYS_PER_WEEK};
