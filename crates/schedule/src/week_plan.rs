// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weekly occurrence table built from all enabled service plans.
//!
//! Days are kept in weekday order and each day's occurrences in
//! minute-of-day order (ties in insertion order). Point-in-time queries
//! rely on both orderings.

use crate::service_plan::ServicePlan;
use crate::state_change::StateChange;
use chrono::{DateTime, Datelike, FixedOffset};
use oh_core::{DesiredState, ServiceRef};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DAYS_PER_WEEK: u8 = 7;

/// Weekday number of `at`, 0 = Sunday.
pub fn weekday_of(at: &DateTime<FixedOffset>) -> u8 {
    // num_days_from_sunday is 0..=6
    at.weekday().num_days_from_sunday() as u8
}

/// One scheduled transition of one service at a time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimePlan {
    pub service: ServiceRef,
    pub hour: u32,
    pub minute: u32,
    pub desired_state: DesiredState,
    pub desired_count: u32,
    pub cron_text: String,
    /// Cleared when the remote inventory does not list the service.
    pub exists_remotely: bool,
}

impl TimePlan {
    fn from_change(service: &ServiceRef, change: &StateChange) -> Self {
        Self {
            service: service.clone(),
            hour: change.cron_spec.hour,
            minute: change.cron_spec.minute,
            desired_state: change.desired_state,
            desired_count: change.desired_count,
            cron_text: change.cron_text.clone(),
            exists_remotely: true,
        }
    }

    pub fn minute_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    fn same_occurrence(&self, other: &TimePlan) -> bool {
        self.service == other.service
            && self.desired_state == other.desired_state
            && self.hour == other.hour
            && self.minute == other.minute
    }
}

impl std::fmt::Display for TimePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "on [{:02}:{:02}] the state of service [{}] is changed to [{}]",
            self.hour,
            self.minute,
            self.service.name(),
            self.desired_state
        )
    }
}

/// Occurrences scheduled on one weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    pub weekday: u8,
    pub occurrences: Vec<TimePlan>,
}

impl DayPlan {
    fn new(weekday: u8) -> Self {
        Self { weekday, occurrences: Vec::new() }
    }

    /// Insert keeping minute-of-day order. Returns false for a duplicate.
    fn insert(&mut self, plan: TimePlan) -> bool {
        if self.occurrences.iter().any(|existing| existing.same_occurrence(&plan)) {
            return false;
        }
        let pos = self.occurrences.partition_point(|p| p.minute_of_day() <= plan.minute_of_day());
        self.occurrences.insert(pos, plan);
        true
    }
}

/// Canonical weekly table of every enabled service's transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekPlan {
    days: BTreeMap<u8, DayPlan>,
}

impl WeekPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a week plan from a list of plans; disabled plans are skipped.
    pub fn from_plans<'a>(plans: impl IntoIterator<Item = &'a ServicePlan>) -> Self {
        let mut week = Self::new();
        for plan in plans {
            week.add_service_plan(plan);
        }
        week
    }

    /// Add every occurrence of `plan`. Re-adding an occurrence is a no-op.
    pub fn add_service_plan(&mut self, plan: &ServicePlan) {
        if !plan.is_scheduled() {
            tracing::debug!(service = %plan.service, disabled = plan.disabled, "service plan not scheduled");
            return;
        }
        for change in &plan.state_changes {
            for &day in &change.cron_spec.days_of_week {
                if day >= DAYS_PER_WEEK {
                    continue;
                }
                let day_plan = self.days.entry(day).or_insert_with(|| DayPlan::new(day));
                day_plan.insert(TimePlan::from_change(&plan.service, change));
            }
        }
    }

    /// Occurrences on `weekday` in time order.
    pub fn schedule_for_day(&self, weekday: u8) -> &[TimePlan] {
        self.days.get(&weekday).map(|d| d.occurrences.as_slice()).unwrap_or(&[])
    }

    /// Days that have at least one occurrence, in weekday order.
    pub fn days(&self) -> impl Iterator<Item = &DayPlan> {
        self.days.values()
    }

    /// Every occurrence of `service` in (weekday, time) order.
    pub fn occurrences_of<'a>(
        &'a self,
        service: &'a ServiceRef,
    ) -> impl Iterator<Item = (u8, &'a TimePlan)> + 'a {
        self.days.values().flat_map(move |day| {
            day.occurrences.iter().filter(move |p| &p.service == service).map(move |p| (day.weekday, p))
        })
    }

    pub fn contains(&self, service: &ServiceRef) -> bool {
        self.occurrences_of(service).next().is_some()
    }

    /// Total number of occurrences across all days.
    pub fn len(&self) -> usize {
        self.days.values().map(|d| d.occurrences.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record which scheduled services the remote inventory knows about.
    pub fn mark_existence<F>(&mut self, exists: F)
    where
        F: Fn(&ServiceRef) -> bool,
    {
        for day in self.days.values_mut() {
            for plan in &mut day.occurrences {
                plan.exists_remotely = exists(&plan.service);
            }
        }
    }
}

#[cfg(test)]
#[path = "week_plan_tests.rs"]
mod tests;
