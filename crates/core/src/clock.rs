// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable wall-clock time
//!
//! Schedules are expressed in wall-clock weekdays and times of day, so the
//! clock hands out offset-aware timestamps rather than monotonic instants.

use chrono::{DateTime, Duration, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use std::sync::Arc;

/// A clock that provides the current wall-clock time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Zone the wall clock is read in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallZone {
    /// Host local time
    #[default]
    Local,
    Fixed(FixedOffset),
    /// IANA zone; the offset follows daylight saving
    Named(Tz),
}

impl WallZone {
    /// Express `instant` in this zone
    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            WallZone::Local => instant.with_timezone(&Local).fixed_offset(),
            WallZone::Fixed(offset) => instant.with_timezone(offset),
            WallZone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }
}

/// Real system clock
///
/// Without an explicit zone the host's local time is used.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock {
    zone: WallZone,
}

impl SystemClock {
    pub fn new(zone: WallZone) -> Self {
        Self { zone }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self::new(WallZone::Fixed(offset))
    }

    pub fn with_time_zone(tz: Tz) -> Self {
        Self::new(WallZone::Named(tz))
    }

    pub fn zone(&self) -> WallZone {
        self.zone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.zone.at(Utc::now())
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl FakeClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { current: Arc::new(Mutex::new(at)) }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock();
        *current += duration;
    }

    /// Set the clock to a specific time
    pub fn set(&self, at: DateTime<FixedOffset>) {
        *self.current.lock() = at;
    }
}

impl Default for FakeClock {
    /// Monday 2024-01-01 12:00 UTC
    fn default() -> Self {
        let noon = DateTime::from_timestamp(1_704_110_400, 0).unwrap_or_default();
        Self::new(noon.fixed_offset())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
