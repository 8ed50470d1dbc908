//! Reconciliation specs
//!
//! A fleet of tagged services is reconciled against its schedules: plan
//! only reports, apply converges, and one broken service never stops the
//! pass for the others.

use crate::prelude::*;

const OFFICE: &str = "running=0 8 1-5. count=3. stopped=0 18 1-5.";

// =============================================================================
// Decision table
// =============================================================================

#[tokio::test]
async fn apply_converges_the_fleet() {
    let fleet = Fleet::new()
        .tagged("web", OFFICE)
        .tagged("api", OFFICE)
        .running("api", 1)
        .tagged("nightly", "running=0 1 0-6. stopped=0 5 0-6.")
        .running("nightly", 2)
        .tagged("idle", "stopped=0 0 0-6.");

    let exec = fleet.executor(FakeClock::new(monday(10, 0)), &Settings::default()).await;
    let outcomes = exec.apply().await;

    let decisions: Vec<(&str, &str)> =
        outcomes.iter().map(|o| (o.service.name(), o.decision.name())).collect();
    assert_eq!(
        decisions,
        vec![("api", "rescale"), ("idle", "no-op"), ("nightly", "stop"), ("web", "start")]
    );
    assert_eq!(fleet.tasks("web"), 3);
    assert_eq!(fleet.tasks("api"), 3);
    assert_eq!(fleet.tasks("nightly"), 0);
    assert_eq!(fleet.tasks("idle"), 0);
}

#[tokio::test]
async fn plan_reports_the_same_decisions_without_mutating() {
    let fleet = Fleet::new().tagged("web", OFFICE).tagged("batch", OFFICE).running("batch", 3);
    let clock = FakeClock::new(monday(19, 0));
    let exec = fleet.executor(clock, &Settings::default()).await;
    fleet.resources.clear_calls();

    let outcomes = exec.plan().await;
    assert_eq!(outcomes[0].decision, Decision::Stop);
    assert_eq!(outcomes[1].decision, Decision::NoOp);
    assert!(fleet.resources.mutations().is_empty());
    assert_eq!(fleet.tasks("batch"), 3);
}

#[tokio::test]
async fn schedule_follows_the_clock() {
    let fleet = Fleet::new().tagged("web", OFFICE);
    let clock = FakeClock::new(monday(7, 0));
    let exec = fleet.executor(clock.clone(), &Settings::default()).await;

    // Sunday's state still holds: last week's Friday stop
    assert_eq!(exec.apply().await[0].decision, Decision::NoOp);

    clock.advance(chrono::Duration::hours(2));
    assert_eq!(exec.apply().await[0].decision, Decision::Start { count: 3 });
    assert_eq!(fleet.tasks("web"), 3);

    clock.advance(chrono::Duration::hours(10));
    assert_eq!(exec.apply().await[0].decision, Decision::Stop);
    assert_eq!(fleet.tasks("web"), 0);
}

// =============================================================================
// Failure isolation
// =============================================================================

#[tokio::test]
async fn broken_services_do_not_stop_the_pass() {
    let fleet = Fleet::new()
        .tagged("bad-tag", "running=0 8 1-5. sleeping=0 18 1-5.")
        .tagged("locked", OFFICE)
        .tagged("web", OFFICE);
    fleet.resources.fail_mutation(&svc("locked"));

    let exec = fleet.executor(FakeClock::new(monday(10, 0)), &Settings::default()).await;
    let outcomes = exec.apply().await;

    assert_eq!(outcomes[0].decision, Decision::Skip { reason: SkipReason::Disabled });
    assert!(outcomes[1].error.is_some());
    assert!(outcomes[2].applied);
    assert_eq!(fleet.tasks("web"), 3);
}

#[tokio::test]
async fn references_share_a_schedule() {
    let fleet = Fleet::new().tagged("web", OFFICE).tagged("worker", "@web");
    let exec = fleet.executor(FakeClock::new(monday(10, 0)), &Settings::default()).await;

    exec.apply().await;
    assert_eq!(fleet.tasks("worker"), 3);
}

// =============================================================================
// Manual overrides
// =============================================================================

#[tokio::test]
async fn manual_override_is_undone_by_the_next_apply() {
    let fleet = Fleet::new().tagged("web", OFFICE);
    let exec = fleet.executor(FakeClock::new(monday(22, 0)), &Settings::default()).await;

    exec.start(svc("web").as_str()).await.unwrap();
    assert_eq!(fleet.tasks("web"), 1);

    exec.apply().await;
    assert_eq!(fleet.tasks("web"), 0);
}
