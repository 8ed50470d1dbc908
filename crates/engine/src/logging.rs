// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for hosts embedding the engine.

use tracing_subscriber::EnvFilter;

/// Variable holding the log filter directives
pub const LOG_FILTER_VAR: &str = "OH_LOG";
const DEFAULT_FILTER: &str = "info";

/// Install a fmt subscriber filtered by `OH_LOG` (default `info`).
///
/// Returns false when a global subscriber was already installed.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init().is_ok()
}
