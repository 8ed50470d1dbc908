// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use chrono::FixedOffset;
use chrono_tz::Tz;
use oh_core::{SystemClock, WallZone};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const TAG_NAME_VAR: &str = "OH_TAG_NAME";
pub const TIME_ZONE_VAR: &str = "OH_TIME_ZONE";
pub const UTC_OFFSET_VAR: &str = "OH_UTC_OFFSET";
pub const PLAN_FILE_VAR: &str = "OH_PLAN_FILE";
pub const PROFILE_VAR: &str = "OH_PROFILE";
pub const CALL_TIMEOUT_VAR: &str = "OH_CALL_TIMEOUT_MS";

/// Tag holding the schedule when `OH_TAG_NAME` is unset
pub const DEFAULT_TAG_NAME: &str = "offhours";
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown OH_TIME_ZONE {0:?}: expected an IANA zone such as Europe/Amsterdam")]
    InvalidTimeZone(String),
    #[error("invalid OH_UTC_OFFSET {0:?}: expected an offset such as +02:00")]
    InvalidOffset(String),
    #[error("invalid OH_CALL_TIMEOUT_MS {0:?}: expected milliseconds")]
    InvalidTimeout(String),
}

/// Engine settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Tag carrying the schedule DSL
    pub tag_name: String,
    /// Wall clock zone; `OH_TIME_ZONE` wins over `OH_UTC_OFFSET`
    pub zone: WallZone,
    /// Local declarative plan file
    pub plan_file: Option<PathBuf>,
    pub profile: String,
    /// Deadline around each resource manager call
    pub call_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_string(),
            zone: WallZone::Local,
            plan_file: None,
            profile: DEFAULT_PROFILE.to_string(),
            call_timeout: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let zone = match (var(TIME_ZONE_VAR), var(UTC_OFFSET_VAR)) {
            (Some(name), _) => WallZone::Named(
                name.parse::<Tz>().map_err(|_| SettingsError::InvalidTimeZone(name))?,
            ),
            (None, Some(raw)) => WallZone::Fixed(parse_offset(&raw)?),
            (None, None) => WallZone::Local,
        };
        let call_timeout = match var(CALL_TIMEOUT_VAR) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| SettingsError::InvalidTimeout(raw))?,
            ),
            None => None,
        };

        Ok(Self {
            tag_name: var(TAG_NAME_VAR).unwrap_or(defaults.tag_name),
            zone,
            plan_file: var(PLAN_FILE_VAR).map(PathBuf::from),
            profile: var(PROFILE_VAR).unwrap_or(defaults.profile),
            call_timeout,
        })
    }

    /// Wall clock the schedule is evaluated in
    pub fn clock(&self) -> SystemClock {
        SystemClock::new(self.zone)
    }
}

fn parse_offset(raw: &str) -> Result<FixedOffset, SettingsError> {
    if raw.eq_ignore_ascii_case("utc") || raw == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(|| SettingsError::InvalidOffset(raw.into()));
    }
    raw.parse::<FixedOffset>().map_err(|_| SettingsError::InvalidOffset(raw.to_string()))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
