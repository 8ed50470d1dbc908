// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::reference::resolve_reference;
use oh_core::test_support::at;
use oh_core::DesiredState;

fn validated(config: &str) -> ServicePlan {
    let mut plan = ServicePlan::new("arn:aws:ecs:eu-west-1:1:service/ops/janitor", config);
    plan.validate().unwrap();
    plan
}

#[test]
fn validate_sorts_changes_by_time_of_day() {
    let plan = validated("stopped=0 18 1-5. running=30 7 1-5. running=0 12 6.");
    let minutes: Vec<u32> = plan.state_changes.iter().map(|c| c.minute_of_day()).collect();
    assert_eq!(minutes, vec![7 * 60 + 30, 12 * 60, 18 * 60]);
}

#[test]
fn validate_sort_is_stable_for_equal_times() {
    let plan = validated("stopped=0 9 1. running=0 9 2.");
    assert_eq!(plan.state_changes[0].desired_state, DesiredState::Stopped);
    assert_eq!(plan.state_changes[1].desired_state, DesiredState::Running);
}

#[test]
fn validate_failure_disables_plan_and_keeps_error() {
    let mut plan = ServicePlan::new("svc/a", "running=0 8 1-5. paused=0 12 1");
    let err = plan.validate().unwrap_err();
    assert!(matches!(err, ParseError::UnknownState { .. }));
    assert!(plan.disabled);
    assert_eq!(plan.config_error.as_deref(), Some(err.to_string().as_str()));
}

#[test]
fn validate_returns_parse_warnings() {
    let mut plan = ServicePlan::new("svc/a", "count=3. stopped=0 0 0");
    let warnings = plan.validate().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(!plan.disabled);
}

#[test]
fn validate_uses_resolved_config() {
    let mut plan = ServicePlan::new("svc/worker", "@api");
    assert!(plan.needs_resolution());
    plan.apply_resolution(&resolve_reference("@api", |_| Some("running=0 0 0-6".to_string())));
    plan.validate().unwrap();
    assert_eq!(plan.state_changes.len(), 1);
    assert_eq!(plan.raw_config, "@api");
}

#[test]
fn unresolved_reference_fails_validation() {
    let mut plan = ServicePlan::new("svc/worker", "@api");
    assert!(matches!(plan.validate(), Err(ParseError::UnresolvedReference { .. })));
    assert!(plan.disabled);
}

#[test]
fn missing_reference_target_leaves_plan_unscheduled() {
    let mut plan = ServicePlan::new("svc/worker", "@ghost");
    plan.apply_resolution(&resolve_reference("@ghost", |_| None));
    plan.validate().unwrap();
    assert!(!plan.disabled);
    assert!(!plan.is_scheduled());
}

#[test]
fn validate_parses_explicit_state_changes() {
    let mut plan = ServicePlan::new("svc/a", "");
    plan.state_changes = vec![StateChange {
        desired_state: DesiredState::Running,
        desired_count: 2,
        cron_text: "0 8 1-5".to_string(),
        cron_spec: Default::default(),
    }];
    plan.validate().unwrap();
    assert_eq!(plan.state_changes[0].cron_spec.days_of_week, vec![1, 2, 3, 4, 5]);
}

#[test]
fn desired_count_follows_todays_changes() {
    let plan = validated("running=0 8 1-5. count=3. running=0 12 1-5. count=5. stopped=0 18 1-5");
    // 2024-01-01 is a Monday
    assert_eq!(plan.desired_count_at(&at(2024, 1, 1, 7, 59)), 0);
    assert_eq!(plan.desired_count_at(&at(2024, 1, 1, 8, 0)), 3);
    assert_eq!(plan.desired_count_at(&at(2024, 1, 1, 13, 0)), 5);
    assert_eq!(plan.desired_count_at(&at(2024, 1, 1, 19, 0)), 0);
}

#[test]
fn desired_count_ignores_other_days() {
    let plan = validated("running=0 8 6. count=4");
    // Monday: the Saturday change does not apply
    assert_eq!(plan.desired_count_at(&at(2024, 1, 1, 12, 0)), 0);
    // Saturday
    assert_eq!(plan.desired_count_at(&at(2024, 1, 6, 12, 0)), 4);
}

#[test]
fn disabled_plan_is_assumed_always_running() {
    let mut plan = validated("stopped=0 0 0-6");
    assert_eq!(plan.percentage_running(), 0.0);
    plan.disabled = true;
    assert_eq!(plan.percentage_running(), 1.0);
}

#[test]
fn office_hours_utilization() {
    let plan = validated("running=0 9 1-5. stopped=0 17 1-5.");
    let p = plan.percentage_running();
    assert_eq!((p * 100.0) as i64, 23);
    assert!((p - 40.0 / 168.0).abs() < 1e-9);
}
