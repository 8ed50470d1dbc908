// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time and utilization queries against a [`WeekPlan`].

use crate::week_plan::{weekday_of, TimePlan, WeekPlan};
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone};
use oh_core::{DesiredState, ServiceRef};
use serde::Serialize;

pub const MINUTES_PER_DAY: i64 = 1_440;
pub const MINUTES_PER_WEEK: i64 = 7 * MINUTES_PER_DAY;

/// A scheduled transition projected onto a calendar timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduledEvent {
    pub service: ServiceRef,
    pub desired_state: DesiredState,
    pub desired_count: u32,
    pub at: DateTime<FixedOffset>,
}

impl ScheduledEvent {
    fn from_plan(plan: &TimePlan, at: DateTime<FixedOffset>) -> Self {
        Self {
            service: plan.service.clone(),
            desired_state: plan.desired_state,
            desired_count: plan.desired_count,
            at,
        }
    }
}

impl std::fmt::Display for ScheduledEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "on [{}] the desired state of service [{}] is [{}]",
            self.at.format("%Y-%m-%d %H:%M:%S"),
            self.service.name(),
            self.desired_state
        )
    }
}

/// Timestamp of `plan` on `weekday` of the week containing `now`, shifted
/// by `week_shift` whole weeks.
fn project(
    now: &DateTime<FixedOffset>,
    weekday: u8,
    plan: &TimePlan,
    week_shift: i64,
) -> Option<DateTime<FixedOffset>> {
    let days = i64::from(weekday) - i64::from(weekday_of(now)) + 7 * week_shift;
    let local = now.date_naive().and_time(NaiveTime::MIN)
        + Duration::days(days)
        + Duration::minutes(i64::from(plan.minute_of_day()));
    now.timezone().from_local_datetime(&local).single()
}

impl WeekPlan {
    /// Occurrences of the calendar day of `day`, projected to timestamps.
    pub fn scheduled_events_on(&self, day: &DateTime<FixedOffset>) -> Vec<ScheduledEvent> {
        let weekday = weekday_of(day);
        self.schedule_for_day(weekday)
            .iter()
            .filter_map(|plan| project(day, weekday, plan, 0).map(|at| ScheduledEvent::from_plan(plan, at)))
            .collect()
    }

    /// Most recent transition of `service` at or before `now`.
    ///
    /// Occurrences are projected onto the week containing `now`. When none of
    /// them lies at or before `now`, the week's last occurrence is taken from
    /// the previous week. `None` means the service has no occurrences at all.
    pub fn last_scheduled_event_at(
        &self,
        service: &ServiceRef,
        now: &DateTime<FixedOffset>,
    ) -> Option<ScheduledEvent> {
        let mut last = None;
        for (weekday, plan) in self.occurrences_of(service) {
            let Some(at) = project(now, weekday, plan, 0) else {
                continue;
            };
            // occurrences are in (weekday, time) order
            if at > *now {
                break;
            }
            last = Some(ScheduledEvent::from_plan(plan, at));
        }
        if last.is_some() {
            return last;
        }

        let (weekday, plan) = self.occurrences_of(service).last()?;
        let at = project(now, weekday, plan, -1)?;
        Some(ScheduledEvent::from_plan(plan, at))
    }

    /// Fraction of the week `service` is scheduled to be running.
    ///
    /// The schedule is cyclic: the last transition of the week holds until the
    /// first transition of the next week. A service without transitions is
    /// assumed to run all the time.
    pub fn percentage_running(&self, service: &ServiceRef) -> f64 {
        let transitions: Vec<(i64, DesiredState)> = self
            .occurrences_of(service)
            .map(|(weekday, plan)| {
                (i64::from(weekday) * MINUTES_PER_DAY + i64::from(plan.minute_of_day()), plan.desired_state)
            })
            .collect();
        let Some(&(first_at, first_state)) = transitions.first() else {
            return 1.0;
        };

        // walk until the first transition comes around again
        let wrapped = (first_at + MINUTES_PER_WEEK, first_state);
        let mut running_minutes = 0;
        let mut current = (first_at, first_state);
        for &next in transitions.iter().skip(1).chain(std::iter::once(&wrapped)) {
            if current.1.is_running() {
                running_minutes += next.0 - current.0;
            }
            current = next;
        }

        (running_minutes as f64 / MINUTES_PER_WEEK as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
