// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cronspec parsing: `<minute> <hour> <days>`
//!
//! The days field is a single day (`3`), an inclusive range (`1-5`) or an
//! explicit enumeration (`0/6`). Days are numbered 0 (Sunday) to 6 (Saturday).

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DAY_SEPARATOR: char = '/';
const RANGE_SEPARATOR: char = '-';

const MAX_MINUTE: u32 = 59;
const MAX_HOUR: u32 = 23;
const MAX_DAY: u32 = 6;

/// Parsed weekly recurrence.
///
/// A default (empty) day set is never effective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CronSpec {
    pub minute: u32,
    pub hour: u32,
    pub days_of_week: Vec<u8>,
}

impl CronSpec {
    pub fn minute_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn is_effective_on(&self, weekday: u8) -> bool {
        self.days_of_week.contains(&weekday)
    }
}

impl std::fmt::Display for CronSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ", self.minute, self.hour)?;
        for (i, day) in self.days_of_week.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", DAY_SEPARATOR)?;
            }
            write!(f, "{}", day)?;
        }
        Ok(())
    }
}

impl FromStr for CronSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cron_spec(s)
    }
}

/// Parse a `<minute> <hour> <days>` cronspec.
pub fn parse_cron_spec(expr: &str) -> Result<CronSpec, ParseError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let [minute, hour, days] = fields.as_slice() else {
        return Err(ParseError::InvalidCron { expr: expr.to_string() });
    };

    let minute = parse_field("minute", minute, MAX_MINUTE, expr)?;
    let hour = parse_field("hour", hour, MAX_HOUR, expr)?;
    let days_of_week = parse_days(days, expr)?;

    Ok(CronSpec { minute, hour, days_of_week })
}

fn parse_days(days: &str, expr: &str) -> Result<Vec<u8>, ParseError> {
    if days.contains(DAY_SEPARATOR) {
        let mut list = Vec::new();
        for day in days.split(DAY_SEPARATOR) {
            let day = parse_day(day, expr)?;
            if list.contains(&day) {
                return Err(ParseError::DuplicateDay { day, expr: expr.to_string() });
            }
            list.push(day);
        }
        return Ok(list);
    }

    if let Some((first, last)) = days.split_once(RANGE_SEPARATOR) {
        let first = parse_day(first, expr)?;
        let last = parse_day(last, expr)?;
        if first > last {
            return Err(ParseError::EmptyRange { expr: expr.to_string() });
        }
        return Ok((first..=last).collect());
    }

    Ok(vec![parse_day(days, expr)?])
}

fn parse_day(value: &str, expr: &str) -> Result<u8, ParseError> {
    let day = parse_field("day", value, MAX_DAY, expr)?;
    // bounded by MAX_DAY
    Ok(day as u8)
}

fn parse_field(field: &'static str, value: &str, max: u32, expr: &str) -> Result<u32, ParseError> {
    let parsed = value.parse::<u32>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
        expr: expr.to_string(),
    })?;
    if parsed > max {
        return Err(ParseError::OutOfRange {
            field,
            value: parsed,
            min: 0,
            max,
            expr: expr.to_string(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
