// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use chrono::{DateTime, FixedOffset, TimeZone};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for schedule vocabulary.
pub mod strategies {
    use crate::DesiredState;
    use proptest::prelude::*;

    pub fn arb_desired_state() -> impl Strategy<Value = DesiredState> {
        prop_oneof![Just(DesiredState::Running), Just(DesiredState::Stopped)]
    }

    /// A single `<minute> <hour> <day>` cronspec.
    pub fn arb_cron_text() -> impl Strategy<Value = String> {
        (0u32..60, 0u32..24, 0u8..7).prop_map(|(m, h, d)| format!("{} {} {}", m, h, d))
    }

    /// A `running=`/`stopped=` clause with a single-day cronspec.
    pub fn arb_clause() -> impl Strategy<Value = String> {
        (arb_desired_state(), arb_cron_text()).prop_map(|(state, cron)| {
            let key = if state.is_running() { "running" } else { "stopped" };
            format!("{}={}", key, cron)
        })
    }

    /// Minute offset into a week (0..10080).
    pub fn arb_minute_of_week() -> impl Strategy<Value = i64> {
        0i64..10_080
    }
}

// ── Time helpers ─────────────────────────────────────────────────

/// UTC timestamp for the given calendar fields.
///
/// January 2024 starts on a Monday, so `at(2024, 1, 7, ..)` is a Sunday.
#[allow(clippy::unwrap_used)]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}
