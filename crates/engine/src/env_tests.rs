// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{DateTime, Timelike};
use std::collections::HashMap;

fn settings(vars: &[(&str, &str)]) -> Result<Settings, SettingsError> {
    let vars: HashMap<String, String> =
        vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_unset() {
    assert_eq!(settings(&[]).unwrap(), Settings::default());
    assert_eq!(Settings::default().tag_name, "offhours");
    assert_eq!(Settings::default().profile, "default");
}

#[test]
fn reads_every_variable() {
    let s = settings(&[
        ("OH_TAG_NAME", "moneypenny"),
        ("OH_UTC_OFFSET", "+02:00"),
        ("OH_PLAN_FILE", "/etc/offhours/plans.toml"),
        ("OH_PROFILE", "staging"),
        ("OH_CALL_TIMEOUT_MS", "1500"),
    ])
    .unwrap();
    assert_eq!(s.tag_name, "moneypenny");
    assert_eq!(s.zone, WallZone::Fixed(FixedOffset::east_opt(7200).unwrap()));
    assert_eq!(s.plan_file, Some(PathBuf::from("/etc/offhours/plans.toml")));
    assert_eq!(s.profile, "staging");
    assert_eq!(s.call_timeout, Some(Duration::from_millis(1500)));
}

#[test]
fn blank_values_count_as_unset() {
    let s = settings(&[("OH_TAG_NAME", "  "), ("OH_PLAN_FILE", "")]).unwrap();
    assert_eq!(s.tag_name, DEFAULT_TAG_NAME);
    assert_eq!(s.plan_file, None);
}

#[yare::parameterized(
    plus_two  = { "+02:00", 7200 },
    minus_five_thirty = { "-05:30", -19800 },
    utc       = { "UTC", 0 },
    zulu      = { "Z", 0 },
)]
fn offsets(raw: &str, seconds: i32) {
    let s = settings(&[("OH_UTC_OFFSET", raw)]).unwrap();
    assert_eq!(s.zone, WallZone::Fixed(FixedOffset::east_opt(seconds).unwrap()));
    assert_eq!(s.clock().zone(), s.zone);
}

#[test]
fn zone_name_in_offset_variable_is_rejected() {
    let err = settings(&[("OH_UTC_OFFSET", "Europe/Amsterdam")]).unwrap_err();
    assert_eq!(err, SettingsError::InvalidOffset("Europe/Amsterdam".into()));
}

#[test]
fn named_time_zone_is_read() {
    let s = settings(&[("OH_TIME_ZONE", "Europe/Amsterdam")]).unwrap();
    assert_eq!(s.zone, WallZone::Named(chrono_tz::Europe::Amsterdam));
    assert_eq!(s.clock().zone(), s.zone);
}

#[test]
fn named_time_zone_wins_over_offset() {
    let s = settings(&[("OH_TIME_ZONE", "America/New_York"), ("OH_UTC_OFFSET", "+02:00")]).unwrap();
    assert_eq!(s.zone, WallZone::Named(chrono_tz::America::New_York));
}

#[test]
fn unknown_time_zone_is_rejected() {
    let err = settings(&[("OH_TIME_ZONE", "Mars/Olympus")]).unwrap_err();
    assert_eq!(err, SettingsError::InvalidTimeZone("Mars/Olympus".into()));
}

#[yare::parameterized(
    // 2024-01-15 07:30 UTC, a Monday
    winter = { 1_705_303_800, 8 },
    // 2024-07-15 06:30 UTC, a Monday
    summer = { 1_721_025_000, 8 },
)]
fn named_zone_keeps_wall_clock_across_daylight_saving(utc_seconds: i64, hour: u32) {
    let s = settings(&[("OH_TIME_ZONE", "Europe/Amsterdam")]).unwrap();
    let local = s.zone.at(DateTime::from_timestamp(utc_seconds, 0).unwrap());
    assert_eq!((local.hour(), local.minute()), (hour, 30));
}

#[test]
fn invalid_timeout_is_rejected() {
    let err = settings(&[("OH_CALL_TIMEOUT_MS", "soon")]).unwrap_err();
    assert_eq!(err.to_string(), "invalid OH_CALL_TIMEOUT_MS \"soon\": expected milliseconds");
}
