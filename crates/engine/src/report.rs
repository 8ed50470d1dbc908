// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only projections for the reporting layer: the weekly schedule and
//! the live status of every planned service.

use chrono::{DateTime, FixedOffset};
use oh_adapters::ServiceStatus;
use oh_core::{ActualState, DesiredState, ServiceRef};
use oh_schedule::{weekday_of, ServicePlan, TimePlan, WeekPlan, DAYS_PER_WEEK};
use serde::Serialize;

const WEEKDAY_NAMES: [&str; DAYS_PER_WEEK as usize] =
    ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

pub fn weekday_name(weekday: u8) -> &'static str {
    WEEKDAY_NAMES.get(weekday as usize).copied().unwrap_or("?")
}

/// One scheduled transition in the schedule view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduleEntry {
    pub service: ServiceRef,
    pub service_name: String,
    pub cluster_name: String,
    pub hour: u32,
    pub minute: u32,
    pub desired_state: DesiredState,
    pub desired_count: u32,
    pub cron: String,
    pub exists_remotely: bool,
}

impl From<&TimePlan> for ScheduleEntry {
    fn from(plan: &TimePlan) -> Self {
        Self {
            service: plan.service.clone(),
            service_name: plan.service.name().to_string(),
            cluster_name: plan.service.cluster_name(),
            hour: plan.hour,
            minute: plan.minute,
            desired_state: plan.desired_state,
            desired_count: plan.desired_count,
            cron: plan.cron_text.clone(),
            exists_remotely: plan.exists_remotely,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DaySchedule {
    pub weekday: u8,
    pub name: &'static str,
    pub is_today: bool,
    pub entries: Vec<ScheduleEntry>,
}

/// Every day of the week with its ordered transitions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduleView {
    pub profile: String,
    pub generated_at: DateTime<FixedOffset>,
    pub days: Vec<DaySchedule>,
}

impl ScheduleView {
    pub fn build(profile: &str, week: &WeekPlan, now: DateTime<FixedOffset>) -> Self {
        let today = weekday_of(&now);
        let days = (0..DAYS_PER_WEEK)
            .map(|weekday| DaySchedule {
                weekday,
                name: weekday_name(weekday),
                is_today: weekday == today,
                entries: week.schedule_for_day(weekday).iter().map(ScheduleEntry::from).collect(),
            })
            .collect();
        Self { profile: profile.to_string(), generated_at: now, days }
    }

    /// Entries of services the resource manager does not know
    pub fn missing(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.days.iter().flat_map(|d| d.entries.iter()).filter(|e| !e.exists_remotely)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Suggested manual scaling for a running service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "hint", content = "count", rename_all = "kebab-case")]
pub enum ScaleHint {
    Upscale(u32),
    Downscale(u32),
}

/// Compare a running service against today's desired count.
///
/// Below it suggests scaling up to it; more than one task beyond it
/// suggests scaling down to a single task.
pub fn scale_hint(state: ActualState, running_count: u32, desired_count: u32) -> Option<ScaleHint> {
    if !state.is_running() {
        return None;
    }
    if desired_count > running_count {
        Some(ScaleHint::Upscale(desired_count))
    } else if running_count > 1 && running_count > desired_count {
        Some(ScaleHint::Downscale(1))
    } else {
        None
    }
}

/// Live status of one planned service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceStatusRow {
    pub service: ServiceRef,
    pub service_name: String,
    pub cluster_name: String,
    /// Unknown is shown as stopped
    pub actual_state: ActualState,
    pub running_count: u32,
    /// Same-day desired count at generation time
    pub desired_count: u32,
    pub percentage_running: f64,
    pub schedule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_hint: Option<ScaleHint>,
}

impl ServiceStatusRow {
    pub fn build(plan: &ServicePlan, status: &ServiceStatus, now: &DateTime<FixedOffset>) -> Self {
        let actual_state = match status.state {
            ActualState::Unknown => ActualState::Stopped,
            state => state,
        };
        let desired_count = plan.desired_count_at(now);
        Self {
            service: plan.service.clone(),
            service_name: plan.service.name().to_string(),
            cluster_name: plan.service.cluster_name(),
            actual_state,
            running_count: status.running_count,
            desired_count,
            percentage_running: plan.percentage_running(),
            schedule: plan.raw_config.clone(),
            resolved_schedule: plan.resolved_config.clone(),
            config_error: plan.config_error.clone(),
            disabled: plan.disabled,
            scale_hint: scale_hint(actual_state, status.running_count, desired_count),
        }
    }

    /// Utilization as a whole percentage
    pub fn percent(&self) -> u32 {
        (self.percentage_running * 100.0) as u32
    }
}

/// Current status of every planned service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusView {
    pub profile: String,
    pub generated_at: DateTime<FixedOffset>,
    pub weekday: &'static str,
    pub services: Vec<ServiceStatusRow>,
}

impl StatusView {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
