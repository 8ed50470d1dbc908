//! Projection specs: schedule, report and status views

use crate::prelude::*;
use std::io::Write;

const PLANS_TOML: &str = r#"
[[service]]
service  = "arn:aws:ecs:eu-central-1:123456789012:service/shop/reports"
schedule = "running=0 6 1. stopped=0 7 1."

[[service]]
service  = "arn:aws:ecs:eu-central-1:123456789012:service/shop/retired"
schedule = "running=0 6 2."
"#;

#[tokio::test]
async fn schedule_view_merges_tags_and_plan_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plans.toml");
    std::fs::File::create(&path).unwrap().write_all(PLANS_TOML.as_bytes()).unwrap();

    let fleet = Fleet::new().tagged("web", "running=0 8 1-5. stopped=0 18 1-5.").untagged("reports");
    let settings = Settings { plan_file: Some(path), ..Settings::default() };
    let exec = fleet.executor(FakeClock::new(monday(12, 0)), &settings).await;

    let view = exec.schedule();
    let monday_entries: Vec<(&str, u32)> =
        view.days[1].entries.iter().map(|e| (e.service_name.as_str(), e.hour)).collect();
    assert_eq!(monday_entries, vec![("reports", 6), ("reports", 7), ("web", 8), ("web", 18)]);

    // "retired" is missing remotely, so its plan is disabled and unscheduled
    assert!(view.days[2].entries.iter().all(|e| e.service_name == "web"));
    assert!(exec.plans().iter().any(|p| p.service.name() == "retired" && p.disabled));

    let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
    assert_eq!(json["days"][1]["is-today"], true);
}

#[tokio::test]
async fn report_marks_services_deleted_since_fetch() {
    let fleet = Fleet::new().tagged("web", "running=0 8 1-5.").tagged("old", "running=0 9 1.");
    let exec = fleet.executor(FakeClock::new(monday(12, 0)), &Settings::default()).await;

    let fresh = FakeResourceManager::new();
    fresh.add_service(svc("web"));
    let plans = exec.plans().to_vec();
    let exec = PlanExecutor::with_plans(fresh, FakeClock::new(monday(12, 0)), "default", plans);

    let view = exec.report().await.unwrap();
    let missing: Vec<&str> = view.missing().map(|e| e.service_name.as_str()).collect();
    assert_eq!(missing, vec!["old"]);
}

#[tokio::test]
async fn status_view_shows_state_counts_and_hints() {
    let fleet = Fleet::new()
        .tagged("web", "running=0 8 1-5. count=4. stopped=0 18 1-5.")
        .running("web", 2)
        .tagged("typo", "running=0 8 1-5. count=many.");
    let exec = fleet.executor(FakeClock::new(monday(12, 0)), &Settings::default()).await;

    let view = exec.status().await;
    assert_eq!(view.weekday, "Monday");

    let typo = &view.services[0];
    assert!(typo.disabled);
    assert!(typo.config_error.as_deref().unwrap().contains("many"));

    let web = &view.services[1];
    assert_eq!(web.actual_state, ActualState::Running);
    assert_eq!(web.running_count, 2);
    assert_eq!(web.desired_count, 4);
    assert_eq!(web.scale_hint, Some(oh_engine::ScaleHint::Upscale(4)));
    assert_eq!(web.percent(), 29);
}
