//! Schedule DSL specs
//!
//! Clauses are `.`-separated `state=cronspec` pairs; `count=` sizes the
//! preceding running clause and `//` switches off the rest of the string.

use crate::prelude::*;

#[test]
fn cronspec_with_day_range() {
    let spec = parse_cron_spec("0 18 1-5").unwrap();
    assert_eq!((spec.minute, spec.hour), (0, 18));
    assert_eq!(spec.days_of_week, vec![1, 2, 3, 4, 5]);
}

#[test]
fn cronspec_rejects_duplicate_days() {
    assert!(parse_cron_spec("0 18 1/2/2/4/5").is_err());
}

#[test]
fn count_sizes_the_running_clause() {
    let parsed = parse_state_changes("running=0 8 1-5. stopped=0 18 1-5. count=7.").unwrap();
    assert_eq!(parsed.changes.len(), 2);
    let running = parsed
        .changes
        .iter()
        .find(|c| c.desired_state == DesiredState::Running)
        .unwrap();
    assert_eq!(running.desired_count, 7);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn leading_comment_disables_everything() {
    let parsed = parse_state_changes("// running=0 8 1-5. stopped=0 18 1-5. count=7.").unwrap();
    assert!(parsed.changes.is_empty());
}

#[test]
fn trailing_comment_keeps_earlier_clauses() {
    let parsed = parse_state_changes("running=0 8 1-5. // stopped=0 18 1-5.").unwrap();
    assert_eq!(parsed.changes.len(), 1);
}

#[test]
fn lone_count_is_only_a_warning() {
    let parsed = parse_state_changes("count=9").unwrap();
    assert!(parsed.changes.is_empty());
    assert_eq!(parsed.warnings.len(), 1);
}

#[test]
fn unknown_state_fails_and_disables_the_plan() {
    assert!(parse_state_changes("hibernate=0 8 1").is_err());

    let plan = plan("api", "running=0 8 1. hibernate=0 20 1.");
    assert!(plan.disabled);
    assert!(plan.config_error.unwrap().contains("hibernate"));
}

#[test]
fn plan_sorts_changes_by_time_of_day() {
    let plan = plan("api", "stopped=0 18 1-5. running=30 7 1-5.");
    let times: Vec<u32> = plan.state_changes.iter().map(|c| c.minute_of_day()).collect();
    assert_eq!(times, vec![7 * 60 + 30, 18 * 60]);
}
