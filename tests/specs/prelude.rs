//! Shared helpers for specs

pub use chrono::{DateTime, FixedOffset, TimeZone};
pub use oh_adapters::FakeResourceManager;
pub use oh_core::{ActualState, DesiredState, FakeClock, ServiceRef};
pub use oh_engine::{Decision, PlanExecutor, Settings, SkipReason};
pub use oh_schedule::{parse_cron_spec, parse_state_changes, ServicePlan, WeekPlan};

pub fn svc(name: &str) -> ServiceRef {
    ServiceRef::new(format!("arn:aws:ecs:eu-central-1:123456789012:service/shop/{}", name))
}

/// Wall-clock time in UTC
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// January 2024 starts on a Monday; the 7th is a Sunday
pub fn monday(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    utc(2024, 1, 1, hour, minute)
}

pub fn plan(name: &str, schedule: &str) -> ServicePlan {
    let mut plan = ServicePlan::new(svc(name), schedule);
    let _ = plan.validate();
    plan
}

/// A fake fleet with tagged services
pub struct Fleet {
    pub resources: FakeResourceManager,
}

impl Fleet {
    pub fn new() -> Self {
        Self { resources: FakeResourceManager::new() }
    }

    pub fn tagged(self, name: &str, schedule: &str) -> Self {
        self.resources.add_tagged_service(svc(name), "offhours", schedule);
        self
    }

    pub fn untagged(self, name: &str) -> Self {
        self.resources.add_service(svc(name));
        self
    }

    pub fn running(self, name: &str, tasks: u32) -> Self {
        self.resources.set_running(&svc(name), tasks);
        self
    }

    pub fn tasks(&self, name: &str) -> u32 {
        self.resources.status(&svc(name)).map(|s| s.running_count).unwrap_or_default()
    }

    pub async fn executor(
        &self,
        clock: FakeClock,
        settings: &Settings,
    ) -> PlanExecutor<oh_adapters::TimeoutResourceManager<FakeResourceManager>, FakeClock> {
        PlanExecutor::from_settings(self.resources.clone(), clock, settings).await.unwrap()
    }
}
