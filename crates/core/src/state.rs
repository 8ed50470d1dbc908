// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired and observed service states.

use serde::{Deserialize, Serialize};

/// State a schedule asks a service to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DesiredState {
    Running,
    Stopped,
}

crate::simple_display! {
    DesiredState {
        Running => "running",
        Stopped => "stopped",
    }
}

impl DesiredState {
    pub fn is_running(self) -> bool {
        matches!(self, DesiredState::Running)
    }
}

/// State a service was observed in.
///
/// `Unknown` means no status could be derived from the resource manager
/// (e.g. the service has never run a task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActualState {
    Running,
    Stopped,
    Unknown,
}

crate::simple_display! {
    ActualState {
        Running => "running",
        Stopped => "stopped",
        Unknown => "unknown",
    }
}

impl ActualState {
    pub fn is_running(self) -> bool {
        matches!(self, ActualState::Running)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
