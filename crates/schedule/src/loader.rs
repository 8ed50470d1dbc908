// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local declarative service plans (JSON or TOML).
//!
//! JSON files hold an array of records, TOML files a `[[service]]` array:
//!
//! ```toml
//! [[service]]
//! service  = "arn:aws:ecs:eu-west-1:1:service/ops/janitor"
//! schedule = "running=0 8 1-5. stopped=0 18 1-5."
//! ```

use crate::service_plan::ServicePlan;
use crate::state_change::StateChange;
use oh_core::ServiceRef;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Plan file format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Errors from loading a plan file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported plan file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
    #[error("invalid JSON plan file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML plan file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// One service entry of a plan file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlanRecord {
    pub service: ServiceRef,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub disabled: bool,
    /// Records without a profile apply to every profile.
    #[serde(default)]
    pub profile: Option<String>,
    /// Used when `schedule` is empty.
    #[serde(default)]
    pub state_changes: Vec<StateChange>,
}

impl PlanRecord {
    pub fn applies_to(&self, profile: &str) -> bool {
        match self.profile.as_deref() {
            Some(p) => p == profile,
            None => true,
        }
    }

    pub fn into_plan(self) -> ServicePlan {
        ServicePlan {
            service: self.service,
            raw_config: self.schedule,
            state_changes: self.state_changes,
            disabled: self.disabled,
            ..ServicePlan::default()
        }
    }
}

#[derive(Deserialize)]
struct TomlPlanFile {
    #[serde(default)]
    service: Vec<PlanRecord>,
}

/// Parse plan records from file content.
pub fn parse_plan_records(content: &str, format: Format) -> Result<Vec<PlanRecord>, LoadError> {
    match format {
        Format::Json => Ok(serde_json::from_str(content)?),
        Format::Toml => Ok(toml::from_str::<TomlPlanFile>(content)?.service),
    }
}

/// Load the plans for `profile` from `path`.
///
/// Plans are validated unless their schedule is a reference, which the
/// caller resolves against the remote inventory. An invalid schedule does
/// not fail the load: that plan comes back disabled with its error kept.
pub fn load_service_plans(path: &Path, profile: &str) -> Result<Vec<ServicePlan>, LoadError> {
    let format =
        Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    let mut plans = Vec::new();
    for record in parse_plan_records(&content, format)? {
        if !record.applies_to(profile) {
            tracing::debug!(service = %record.service, profile, "plan belongs to another profile");
            continue;
        }
        let mut plan = record.into_plan();
        if !plan.needs_resolution() {
            if let Err(e) = plan.validate() {
                tracing::warn!(service = %plan.service, error = %e, "invalid schedule, plan disabled");
            }
        }
        tracing::info!(service = %plan.service, disabled = plan.disabled, "loaded service plan");
        plans.push(plan);
    }

    tracing::info!(file = %path.display(), count = plans.len(), "read service plans");
    Ok(plans)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
