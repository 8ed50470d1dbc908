// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconcile decision table: observed state vs scheduled state.

use crate::action::Action;
use oh_adapters::ServiceStatus;
use oh_core::{ActualState, DesiredState, ServiceRef};
use oh_schedule::ScheduledEvent;
use serde::Serialize;

/// Why a service was left alone without comparing states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum SkipReason {
    Disabled,
    /// No occurrence in the week plan; not under schedule control.
    Unscheduled,
    DescribeFailed(String),
    /// Status unknown and the service is missing from the inventory.
    Missing,
}

oh_core::simple_display! {
    SkipReason {
        Disabled => "plan is disabled",
        Unscheduled => "service has no scheduled events",
        DescribeFailed(..) => "service status could not be obtained",
        Missing => "service status is unknown and it does not exist remotely",
    }
}

/// Corrective step for one service in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "kebab-case")]
pub enum Decision {
    Skip { reason: SkipReason },
    NoOp,
    Stop,
    Start { count: u32 },
    Rescale { from: u32, to: u32 },
}

impl Decision {
    pub fn name(&self) -> &'static str {
        match self {
            Decision::Skip { .. } => "skip",
            Decision::NoOp => "no-op",
            Decision::Stop => "stop",
            Decision::Start { .. } => "start",
            Decision::Rescale { .. } => "rescale",
        }
    }

    /// True when the decision changes remote state
    pub fn is_change(&self) -> bool {
        matches!(self, Decision::Stop | Decision::Start { .. } | Decision::Rescale { .. })
    }

    /// Human readable reason for the decision
    pub fn justification(&self) -> String {
        match self {
            Decision::Skip { reason: SkipReason::DescribeFailed(e) } => {
                format!("skipped: service status could not be obtained: {}", e)
            }
            Decision::Skip { reason } => format!("skipped: {}", reason),
            Decision::NoOp => "service is in expected state".to_string(),
            Decision::Stop => "service is running but must be stopped".to_string(),
            Decision::Start { count } => format!("service must be running with {} task(s)", count),
            Decision::Rescale { from, to } => {
                format!("service must have a different task count: {} -> {}", from, to)
            }
        }
    }

    /// Actions that carry out this decision, in order.
    ///
    /// Stopping scales to zero first, then terminates any task still
    /// running instead of waiting for the manager to converge.
    pub fn actions(&self, service: &ServiceRef) -> Vec<Action> {
        match self {
            Decision::Skip { .. } | Decision::NoOp => Vec::new(),
            Decision::Stop => vec![
                Action::SetDesiredCount { service: service.clone(), count: 0 },
                Action::StopRunningTasks { service: service.clone() },
            ],
            Decision::Start { count } => {
                vec![Action::SetDesiredCount { service: service.clone(), count: *count }]
            }
            Decision::Rescale { to, .. } => {
                vec![Action::SetDesiredCount { service: service.clone(), count: *to }]
            }
        }
    }
}

/// Count a running service should have; unspecified (0) means one task.
pub fn effective_count(desired_count: u32) -> u32 {
    desired_count.max(1)
}

/// Compare the observed status with the last scheduled event.
///
/// An unknown status counts as stopped when the service is known to exist
/// remotely; otherwise the service is skipped.
pub fn decide(status: &ServiceStatus, desired: &ScheduledEvent, exists_remotely: bool) -> Decision {
    let actual = match status.state {
        ActualState::Unknown if exists_remotely => ActualState::Stopped,
        ActualState::Unknown => return Decision::Skip { reason: SkipReason::Missing },
        state => state,
    };

    match (actual, desired.desired_state) {
        (ActualState::Running, DesiredState::Stopped) => Decision::Stop,
        (ActualState::Running, DesiredState::Running) => {
            let want = effective_count(desired.desired_count);
            if status.running_count == want {
                Decision::NoOp
            } else {
                Decision::Rescale { from: status.running_count, to: want }
            }
        }
        (_, DesiredState::Running) => {
            Decision::Start { count: effective_count(desired.desired_count) }
        }
        (_, DesiredState::Stopped) => Decision::NoOp,
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
