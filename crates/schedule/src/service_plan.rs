// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One service's schedule configuration and its validated state changes.

use crate::cron::parse_cron_spec;
use crate::error::ParseError;
use crate::reference::{is_reference, Resolution};
use crate::state_change::{parse_state_changes, ParseWarning, StateChange};
use crate::week_plan::{weekday_of, WeekPlan};
use chrono::{DateTime, FixedOffset, Timelike};
use oh_core::ServiceRef;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServicePlan {
    pub service: ServiceRef,
    /// Schedule as configured (tag value or file entry); may be a reference.
    pub raw_config: String,
    /// Schedule a reference resolved to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_config: Option<String>,
    /// Sorted by time of day once validated.
    pub state_changes: Vec<StateChange>,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
}

impl ServicePlan {
    pub fn new(service: impl Into<ServiceRef>, raw_config: impl Into<String>) -> Self {
        Self { service: service.into(), raw_config: raw_config.into(), ..Self::default() }
    }

    /// Schedule string that validation parses.
    pub fn effective_config(&self) -> &str {
        self.resolved_config.as_deref().unwrap_or(&self.raw_config)
    }

    /// True when the raw config is a reference that has not been resolved yet.
    pub fn needs_resolution(&self) -> bool {
        self.resolved_config.is_none() && is_reference(&self.raw_config)
    }

    /// Record the outcome of resolving `raw_config`.
    pub fn apply_resolution(&mut self, resolution: &Resolution) {
        if resolution.is_reference() {
            self.resolved_config = Some(resolution.config().to_string());
        }
    }

    /// Parse the schedule into sorted state changes.
    ///
    /// On failure the plan is disabled and the error text retained, so a
    /// misconfigured service is never left in an undetermined state.
    pub fn validate(&mut self) -> Result<Vec<ParseWarning>, ParseError> {
        match self.parse() {
            Ok(warnings) => {
                self.state_changes.sort_by_key(StateChange::minute_of_day);
                Ok(warnings)
            }
            Err(e) => {
                self.disabled = true;
                self.config_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn parse(&mut self) -> Result<Vec<ParseWarning>, ParseError> {
        if self.needs_resolution() {
            return Err(ParseError::UnresolvedReference { reference: self.raw_config.clone() });
        }
        let config = self.effective_config();
        if !config.trim().is_empty() {
            let parsed = parse_state_changes(config)?;
            self.state_changes = parsed.changes;
            return Ok(parsed.warnings);
        }
        // explicitly listed changes only carry their cron text
        for change in &mut self.state_changes {
            change.cron_spec = parse_cron_spec(&change.cron_text)?;
        }
        Ok(Vec::new())
    }

    /// Desired count of the last change today at or before `now`'s time of
    /// day; 0 when nothing has triggered yet today.
    pub fn desired_count_at(&self, now: &DateTime<FixedOffset>) -> u32 {
        let weekday = weekday_of(now);
        let minutes = now.hour() * 60 + now.minute();
        self.state_changes
            .iter()
            .filter(|c| c.cron_spec.is_effective_on(weekday))
            .take_while(|c| c.minute_of_day() <= minutes)
            .last()
            .map(|c| c.desired_count)
            .unwrap_or(0)
    }

    /// Fraction of the week this service is scheduled to run.
    pub fn percentage_running(&self) -> f64 {
        if self.disabled {
            return 1.0;
        }
        let mut week = WeekPlan::new();
        week.add_service_plan(self);
        week.percentage_running(&self.service)
    }

    pub fn is_scheduled(&self) -> bool {
        !self.disabled && !self.state_changes.is_empty()
    }
}

#[cfg(test)]
#[path = "service_plan_tests.rs"]
mod tests;
