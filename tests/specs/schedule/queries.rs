//! Weekly query specs: last scheduled event and utilization

use crate::prelude::*;

#[test]
fn office_hours_utilization() {
    let plan = plan("api", "running=0 9 1-5. stopped=0 17 1-5.");
    let p = plan.percentage_running();
    assert_eq!((p * 100.0) as u32, 23);
}

#[test]
fn always_on_and_always_off() {
    assert_eq!(plan("on", "running=0 0 0-6").percentage_running(), 1.0);
    assert_eq!(plan("off", "stopped=0 0 0-6").percentage_running(), 0.0);
}

#[test]
fn one_day_window() {
    let p = plan("api", "running=0 0 1. stopped=0 0 2.").percentage_running();
    assert!((p - 1.0 / 7.0).abs() < 1e-9);
}

#[test]
fn unscheduled_or_disabled_counts_as_always_running() {
    assert_eq!(plan("none", "").percentage_running(), 1.0);
    assert_eq!(plan("bad", "running=99 8 1").percentage_running(), 1.0);
}

#[test]
fn sunday_stop_seen_on_monday() {
    let plans = [plan("api", "stopped=0 0 0.")];
    let week = WeekPlan::from_plans(&plans);

    let event = week.last_scheduled_event_at(&svc("api"), &monday(9, 0)).unwrap();
    assert_eq!(event.desired_state, DesiredState::Stopped);
    assert_eq!(event.at, utc(2023, 12, 31, 0, 0));
}

#[test]
fn last_event_wraps_into_previous_week() {
    let plans = [plan("api", "running=0 8 5. stopped=0 20 5.")];
    let week = WeekPlan::from_plans(&plans);

    // Monday, before anything this week: last Friday evening counts
    let event = week.last_scheduled_event_at(&svc("api"), &monday(9, 0)).unwrap();
    assert_eq!(event.desired_state, DesiredState::Stopped);
    assert_eq!(event.at, utc(2023, 12, 29, 20, 0));
}

#[test]
fn transition_at_exactly_now_counts() {
    let plans = [plan("api", "running=0 8 1-5. stopped=0 18 1-5.")];
    let week = WeekPlan::from_plans(&plans);
    let event = week.last_scheduled_event_at(&svc("api"), &monday(8, 0)).unwrap();
    assert_eq!(event.desired_state, DesiredState::Running);
}

#[test]
fn unknown_service_has_no_event() {
    let plans = [plan("api", "running=0 8 1-5.")];
    let week = WeekPlan::from_plans(&plans);
    assert!(week.last_scheduled_event_at(&svc("other"), &monday(9, 0)).is_none());
}

#[test]
fn adding_a_plan_twice_changes_nothing() {
    let api = plan("api", "running=0 8 1-5. stopped=0 18 1-5.");
    let mut once = WeekPlan::new();
    once.add_service_plan(&api);
    let mut twice = once.clone();
    twice.add_service_plan(&api);
    assert_eq!(once, twice);
    assert_eq!(twice.len(), 10);
}
