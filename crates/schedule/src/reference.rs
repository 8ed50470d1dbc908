// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-level schedule references: `@billing-api` reuses the schedule of
//! the service whose short name is `billing-api`.

const REFERENCE_MARKER: char = '@';

/// Outcome of resolving a schedule value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The value was not a reference and is used as is.
    Literal(String),
    /// The referenced service's schedule.
    Resolved { target: String, config: String },
    /// No service with the referenced name carries a schedule.
    NotFound { target: String },
    /// The referenced schedule is itself a reference; not followed.
    Chained { target: String, config: String },
}

impl Resolution {
    /// Schedule string to validate; empty when the reference could not be used.
    pub fn config(&self) -> &str {
        match self {
            Resolution::Literal(config) | Resolution::Resolved { config, .. } => config,
            Resolution::NotFound { .. } | Resolution::Chained { .. } => "",
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, Resolution::Literal(_))
    }
}

pub fn is_reference(value: &str) -> bool {
    value.trim_start().starts_with(REFERENCE_MARKER)
}

/// Short service name a reference points to.
pub fn reference_target(value: &str) -> Option<&str> {
    value.trim().strip_prefix(REFERENCE_MARKER).map(str::trim)
}

/// Resolve `value` against `lookup`, which maps a short service name to
/// that service's raw schedule. Only one level is followed.
pub fn resolve_reference<F>(value: &str, lookup: F) -> Resolution
where
    F: Fn(&str) -> Option<String>,
{
    let Some(target) = reference_target(value) else {
        return Resolution::Literal(value.to_string());
    };
    let target = target.to_string();
    match lookup(&target) {
        None => {
            tracing::warn!(reference = value, "referenced service not found, treating as unscheduled");
            Resolution::NotFound { target }
        }
        Some(config) if is_reference(&config) => {
            tracing::warn!(
                reference = value,
                target_schedule = %config,
                "referenced schedule is itself a reference, not following"
            );
            Resolution::Chained { target, config }
        }
        Some(config) => Resolution::Resolved { target, config },
    }
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
