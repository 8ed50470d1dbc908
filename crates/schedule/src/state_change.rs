// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule DSL: `running=0 8 1-5. stopped=0 18 1-5. count=2.`
//!
//! Clauses are separated by `.`. A clause starting with `//` disables itself
//! and every clause after it.

use crate::cron::{parse_cron_spec, CronSpec};
use crate::error::ParseError;
use oh_core::DesiredState;
use serde::{Deserialize, Serialize};

const CLAUSE_SEPARATOR: char = '.';
const COMMENT_MARKER: &str = "//";

const RUNNING_KEY: &str = "running";
const STOPPED_KEY: &str = "stopped";
const COUNT_KEY: &str = "count";

/// A single desired-state transition of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StateChange {
    pub desired_state: DesiredState,
    /// Only meaningful for `Running`; 0 means unspecified.
    #[serde(default)]
    pub desired_count: u32,
    #[serde(rename = "cron")]
    pub cron_text: String,
    #[serde(skip)]
    pub cron_spec: CronSpec,
}

impl StateChange {
    pub fn new(desired_state: DesiredState, cron_text: &str) -> Result<Self, ParseError> {
        Ok(Self {
            desired_state,
            desired_count: 0,
            cron_text: cron_text.to_string(),
            cron_spec: parse_cron_spec(cron_text)?,
        })
    }

    pub fn minute_of_day(&self) -> u32 {
        self.cron_spec.minute_of_day()
    }
}

impl std::fmt::Display for StateChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}.", self.desired_state, self.cron_text)
    }
}

/// Non-fatal findings while parsing a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// `count=` appeared before any `running=` clause.
    CountWithoutRunning { count: u32 },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::CountWithoutRunning { count } => {
                write!(f, "count={} has no preceding running clause", count)
            }
        }
    }
}

/// Result of parsing a schedule string.
///
/// Changes keep the order of their clauses in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSchedule {
    pub changes: Vec<StateChange>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse a schedule string into its state changes.
pub fn parse_state_changes(input: &str) -> Result<ParsedSchedule, ParseError> {
    let mut parsed = ParsedSchedule::default();

    for clause in input.trim().split(CLAUSE_SEPARATOR) {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        if clause.starts_with(COMMENT_MARKER) {
            break;
        }

        let parts: Vec<&str> = clause.split('=').collect();
        let [key, value] = parts.as_slice() else {
            return Err(ParseError::InvalidClause { clause: clause.to_string() });
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            RUNNING_KEY => parsed.changes.push(StateChange::new(DesiredState::Running, value)?),
            STOPPED_KEY => parsed.changes.push(StateChange::new(DesiredState::Stopped, value)?),
            COUNT_KEY => {
                let count = value
                    .parse::<u32>()
                    .map_err(|_| ParseError::InvalidCount { value: value.to_string() })?;
                match parsed.changes.iter_mut().rev().find(|c| c.desired_state.is_running()) {
                    Some(running) => running.desired_count = count,
                    None => {
                        tracing::warn!(schedule = input, count, "no running change specified for count");
                        parsed.warnings.push(ParseWarning::CountWithoutRunning { count });
                    }
                }
            }
            _ => return Err(ParseError::UnknownState { key: key.to_string() }),
        }
    }

    Ok(parsed)
}

#[cfg(test)]
#[path = "state_change_tests.rs"]
mod tests;
