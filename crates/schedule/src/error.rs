// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors from parsing a schedule string or one of its cronspecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected state=expression, got {clause:?}")]
    InvalidClause { clause: String },
    #[error("unknown state {key:?}")]
    UnknownState { key: String },
    #[error("expected \"<minute> <hour> <days>\", got {expr:?}")]
    InvalidCron { expr: String },
    #[error("invalid {field} {value:?} in {expr:?}")]
    InvalidNumber { field: &'static str, value: String, expr: String },
    #[error("{field} {value} out of range {min}..={max} in {expr:?}")]
    OutOfRange { field: &'static str, value: u32, min: u32, max: u32, expr: String },
    #[error("duplicate day of week {day} in {expr:?}")]
    DuplicateDay { day: u8, expr: String },
    #[error("day range {expr:?} is empty")]
    EmptyRange { expr: String },
    #[error("invalid count {value:?}")]
    InvalidCount { value: String },
    #[error("reference {reference:?} was not resolved")]
    UnresolvedReference { reference: String },
}
