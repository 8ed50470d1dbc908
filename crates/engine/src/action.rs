// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutations issued against the resource manager

use oh_core::ServiceRef;
use serde::Serialize;

/// A single mutating call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetDesiredCount { service: ServiceRef, count: u32 },
    /// Terminate every task still running
    StopRunningTasks { service: ServiceRef },
}

impl Action {
    /// Action name for log spans
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetDesiredCount { .. } => "set_desired_count",
            Action::StopRunningTasks { .. } => "stop_running_tasks",
        }
    }

    pub fn service(&self) -> &ServiceRef {
        match self {
            Action::SetDesiredCount { service, .. } | Action::StopRunningTasks { service } => {
                service
            }
        }
    }

    /// Key/value pairs for structured logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Action::SetDesiredCount { service, count } => {
                vec![("service", service.name().to_string()), ("count", count.to_string())]
            }
            Action::StopRunningTasks { service } => {
                vec![("service", service.name().to_string())]
            }
        }
    }

    /// Whether to log the action before and after executing it
    pub fn verbose(&self) -> bool {
        match self {
            // Terminating tasks is destructive, keep the full trail
            Action::StopRunningTasks { .. } => true,
            Action::SetDesiredCount { .. } => false,
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
