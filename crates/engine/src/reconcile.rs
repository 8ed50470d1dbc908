// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation of scheduled state against the resource manager.
//!
//! One pass reads each planned service's status, decides against the last
//! scheduled event and, unless dry-running, applies the corrective actions.
//! Per-service failures are reported in the outcome and never abort the pass.

use crate::action::Action;
use crate::decision::{decide, Decision, SkipReason};
use crate::env::Settings;
use crate::executor::{ExecuteError, Executor};
use crate::fetcher::{FetchedPlans, PlanFetcher};
use crate::report::{weekday_name, ScheduleView, ServiceStatusRow, StatusView};
use chrono::{DateTime, FixedOffset};
use oh_adapters::{ResourceError, ResourceManager, ServiceStatus, TimeoutResourceManager};
use oh_core::{Clock, ServiceRef};
use oh_schedule::{load_service_plans, weekday_of, LoadError, ServicePlan, WeekPlan};
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Failures while preparing a run; these are fatal to the run
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to load local plans: {0}")]
    Load(#[from] LoadError),
    #[error("failed to fetch service plans: {0}")]
    Resource(#[from] ResourceError),
}

/// Result of reconciling one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReconcileOutcome {
    pub service: ServiceRef,
    pub decision: Decision,
    pub justification: String,
    /// Actions the decision calls for, whether or not they were issued
    pub actions: Vec<Action>,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconcileOutcome {
    fn new(service: &ServiceRef, decision: Decision) -> Self {
        Self {
            service: service.clone(),
            justification: decision.justification(),
            actions: decision.actions(service),
            decision,
            applied: false,
            error: None,
        }
    }

    fn skipped(service: &ServiceRef, reason: SkipReason) -> Self {
        Self::new(service, Decision::Skip { reason })
    }
}

/// Per-pass counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub started: usize,
    pub stopped: usize,
    pub rescaled: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReconcileSummary {
    pub fn from_outcomes(outcomes: &[ReconcileOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            if outcome.error.is_some() {
                summary.failed += 1;
                continue;
            }
            match outcome.decision {
                Decision::Start { .. } => summary.started += 1,
                Decision::Stop => summary.stopped += 1,
                Decision::Rescale { .. } => summary.rescaled += 1,
                Decision::NoOp => summary.unchanged += 1,
                Decision::Skip { .. } => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Runs the engine's operating modes over one run's plans.
///
/// Instances are built per run and per profile; nothing is shared across them.
pub struct PlanExecutor<R, C> {
    executor: Executor<R>,
    clock: C,
    profile: String,
    plans: Vec<ServicePlan>,
    week: WeekPlan,
}

impl<R: ResourceManager, C: Clock> PlanExecutor<R, C> {
    /// Build from fetched plans, flagging scheduled services missing remotely
    pub fn new(resources: R, clock: C, profile: impl Into<String>, mut fetched: FetchedPlans) -> Self {
        let mut executor = Self::with_plans(resources, clock, profile, std::mem::take(&mut fetched.plans));
        executor.week.mark_existence(|service| fetched.exists(service));
        executor
    }

    /// Build from plans alone; every scheduled service is assumed to exist
    pub fn with_plans(
        resources: R,
        clock: C,
        profile: impl Into<String>,
        plans: Vec<ServicePlan>,
    ) -> Self {
        let week = WeekPlan::from_plans(&plans);
        Self { executor: Executor::new(resources), clock, profile: profile.into(), plans, week }
    }

    pub fn plans(&self) -> &[ServicePlan] {
        &self.plans
    }

    pub fn week_plan(&self) -> &WeekPlan {
        &self.week
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    fn resources(&self) -> &R {
        self.executor.resources()
    }

    /// Dry-run reconciliation: decide and log, never mutate
    pub async fn plan(&self) -> Vec<ReconcileOutcome> {
        let span = info_span!("reconcile", exec = "plan", profile = %self.profile);
        self.reconcile(true).instrument(span).await
    }

    /// Live reconciliation
    pub async fn apply(&self) -> Vec<ReconcileOutcome> {
        let span = info_span!("reconcile", exec = "apply", profile = %self.profile);
        self.reconcile(false).instrument(span).await
    }

    async fn reconcile(&self, dry_run: bool) -> Vec<ReconcileOutcome> {
        let now = self.clock.now();
        info!(time = %now, dry_run, plans = self.plans.len(), "executing");

        let mut outcomes = Vec::with_capacity(self.plans.len());
        for plan in &self.plans {
            outcomes.push(self.reconcile_service(plan, &now, dry_run).await);
        }

        let summary = ReconcileSummary::from_outcomes(&outcomes);
        info!(
            started = summary.started,
            stopped = summary.stopped,
            rescaled = summary.rescaled,
            unchanged = summary.unchanged,
            skipped = summary.skipped,
            failed = summary.failed,
            dry_run,
            "reconcile pass complete"
        );
        outcomes
    }

    async fn reconcile_service(
        &self,
        plan: &ServicePlan,
        now: &DateTime<FixedOffset>,
        dry_run: bool,
    ) -> ReconcileOutcome {
        let service = &plan.service;
        let name = service.name();
        if plan.disabled {
            warn!(service = %name, "disabled plan, skipping");
            return ReconcileOutcome::skipped(service, SkipReason::Disabled);
        }
        let Some(event) = self.week.last_scheduled_event_at(service, now) else {
            debug!(service = %name, "no scheduled events, skipping");
            return ReconcileOutcome::skipped(service, SkipReason::Unscheduled);
        };
        let status = match self.resources().describe(service).await {
            Ok(status) => status,
            Err(e) => {
                warn!(service = %name, error = %e, "failed to describe service, skipping");
                return ReconcileOutcome::skipped(service, SkipReason::DescribeFailed(e.to_string()));
            }
        };

        let decision = decide(&status, &event, self.exists_remotely(service));
        if decision == (Decision::Skip { reason: SkipReason::Missing }) {
            warn!(service = %name, "state unknown and service missing remotely, skipping");
            return ReconcileOutcome::new(service, decision);
        }
        let mut outcome = ReconcileOutcome::new(service, decision);
        info!(
            service = %name,
            state = %status.state,
            tasks = status.running_count,
            schedule = plan.effective_config(),
            desired = %event.desired_state,
            desired_count = event.desired_count,
            since = %event.at,
            decision = outcome.decision.name(),
            "{}",
            outcome.justification
        );

        if !outcome.decision.is_change() || dry_run {
            return outcome;
        }
        match self.executor.execute_all(&outcome.actions).await {
            Ok(()) => outcome.applied = true,
            Err(e) => {
                error!(service = %name, decision = outcome.decision.name(), error = %e, "failed to apply decision");
                outcome.error = Some(e.to_string());
            }
        }
        outcome
    }

    fn exists_remotely(&self, service: &ServiceRef) -> bool {
        self.week.occurrences_of(service).all(|(_, plan)| plan.exists_remotely)
    }

    /// Start a service with one task, bypassing the schedule
    pub async fn start(&self, service: &str) -> Result<(), ExecuteError> {
        self.adhoc("start", service, |service| Decision::Start { count: 1 }.actions(service)).await
    }

    /// Stop a service and terminate its tasks, bypassing the schedule
    pub async fn stop(&self, service: &str) -> Result<(), ExecuteError> {
        self.adhoc("stop", service, |service| Decision::Stop.actions(service)).await
    }

    /// Set a service's task count, bypassing the schedule
    pub async fn rescale(&self, service: &str, count: u32) -> Result<(), ExecuteError> {
        self.adhoc("rescale", service, |service| {
            vec![Action::SetDesiredCount { service: service.clone(), count }]
        })
        .await
    }

    async fn adhoc<F>(&self, exec: &'static str, service: &str, actions: F) -> Result<(), ExecuteError>
    where
        F: FnOnce(&ServiceRef) -> Vec<Action>,
    {
        let span = info_span!("adhoc", exec, profile = %self.profile);
        async {
            let service = ServiceRef::new(service.trim());
            if service.is_empty() {
                return Err(ExecuteError::MissingService);
            }
            info!(service = %service.name(), "manual override");
            self.executor.execute_all(&actions(&service)).await
        }
        .instrument(span)
        .await
    }

    /// Weekly schedule as fetched
    pub fn schedule(&self) -> ScheduleView {
        let _span = info_span!("projection", exec = "schedule", profile = %self.profile).entered();
        info!("write schedule");
        ScheduleView::build(&self.profile, &self.week, self.clock.now())
    }

    /// Weekly schedule with services re-checked against the full inventory
    pub async fn report(&self) -> Result<ScheduleView, ResourceError> {
        let span = info_span!("projection", exec = "report", profile = %self.profile);
        async {
            let inventory: BTreeSet<ServiceRef> =
                self.resources().list_services(None).await?.into_iter().collect();
            let mut week = self.week.clone();
            week.mark_existence(|service| inventory.contains(service));
            let view = ScheduleView::build(&self.profile, &week, self.clock.now());
            for entry in view.missing() {
                warn!(service = %entry.service, "scheduled service does not exist remotely");
            }
            info!("write report");
            Ok::<_, ResourceError>(view)
        }
        .instrument(span)
        .await
    }

    /// Live status of every plan, including disabled ones
    pub async fn status(&self) -> StatusView {
        let span = info_span!("projection", exec = "status", profile = %self.profile);
        async {
            let now = self.clock.now();
            let mut services = Vec::with_capacity(self.plans.len());
            for plan in &self.plans {
                let status = match self.resources().describe(&plan.service).await {
                    Ok(status) => status,
                    Err(e) => {
                        warn!(service = %plan.service.name(), error = %e, "failed to describe service");
                        ServiceStatus::unknown()
                    }
                };
                services.push(ServiceStatusRow::build(plan, &status, &now));
            }
            info!(services = services.len(), "write status");
            StatusView {
                profile: self.profile.clone(),
                generated_at: now,
                weekday: weekday_name(weekday_of(&now)),
                services,
            }
        }
        .instrument(span)
        .await
    }
}

impl<R: ResourceManager, C: Clock> PlanExecutor<TimeoutResourceManager<R>, C> {
    /// Prepare a run from settings: load the local plan file, fetch tagged
    /// plans and wrap every resource manager call in the configured deadline.
    pub async fn from_settings(resources: R, clock: C, settings: &Settings) -> Result<Self, SetupError> {
        let span = info_span!("setup", profile = %settings.profile);
        async {
            let local = match &settings.plan_file {
                Some(path) => load_service_plans(path, &settings.profile)?,
                None => Vec::new(),
            };
            let resources = TimeoutResourceManager::new(resources, settings.call_timeout);
            let fetched =
                PlanFetcher::new(resources.clone(), settings.tag_name.clone()).fetch(local).await?;
            Ok::<_, SetupError>(Self::new(resources, clock, settings.profile.clone(), fetched))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
