// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collects service plans from remote tags and local plan files.
//!
//! Tagged services are enumerated once, `@name` references are resolved one
//! level against the collected schedules, and every plan is validated before
//! it reaches the week plan. Invalid plans are kept, disabled, so the status
//! view can show their error.

use oh_adapters::{ResourceError, ResourceManager};
use oh_core::ServiceRef;
use oh_schedule::{resolve_reference, ServicePlan};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Plans for one run plus the remote inventory they were checked against
#[derive(Debug, Clone, Default)]
pub struct FetchedPlans {
    pub plans: Vec<ServicePlan>,
    /// Every service the resource manager knows, tagged or not
    pub inventory: BTreeSet<ServiceRef>,
}

impl FetchedPlans {
    pub fn exists(&self, service: &ServiceRef) -> bool {
        self.inventory.contains(service)
    }
}

/// Builds the plan list from the resource manager
pub struct PlanFetcher<R> {
    resources: R,
    tag_name: String,
}

impl<R: ResourceManager> PlanFetcher<R> {
    pub fn new(resources: R, tag_name: impl Into<String>) -> Self {
        Self { resources, tag_name: tag_name.into() }
    }

    /// Fetch tagged plans and merge `local` plans over them.
    ///
    /// A local plan replaces a tagged plan for the same service. Local plans
    /// for services missing from the inventory are disabled.
    pub async fn fetch(&self, local: Vec<ServicePlan>) -> Result<FetchedPlans, ResourceError> {
        let inventory: BTreeSet<ServiceRef> =
            self.resources.list_services(None).await?.into_iter().collect();
        let tagged = self.tagged_schedules().await?;

        let mut schedules: HashMap<String, String> = tagged
            .iter()
            .map(|(service, value)| (service.name().to_string(), value.clone()))
            .collect();
        for plan in &local {
            schedules.insert(plan.service.name().to_string(), plan.raw_config.clone());
        }

        let mut plans = Vec::new();
        for (service, value) in tagged {
            if local.iter().any(|p| p.service == service) {
                info!(service = %service.name(), "local plan overrides tag");
                continue;
            }
            let mut plan = ServicePlan::new(service, value);
            if resolve(&mut plan, &schedules) {
                validate(&mut plan);
                plans.push(plan);
            }
        }

        for mut plan in local {
            if !inventory.contains(&plan.service) {
                warn!(service = %plan.service, "service does not exist remotely, plan disabled");
                plan.disabled = true;
            }
            if plan.needs_resolution() {
                resolve(&mut plan, &schedules);
                validate(&mut plan);
            }
            plans.push(plan);
        }

        info!(plans = plans.len(), inventory = inventory.len(), "fetched service plans");
        Ok(FetchedPlans { plans, inventory })
    }

    /// Services carrying the schedule tag with their tag values
    async fn tagged_schedules(&self) -> Result<Vec<(ServiceRef, String)>, ResourceError> {
        let services = self.resources.list_services(Some(&self.tag_name)).await?;
        let mut tagged = Vec::with_capacity(services.len());
        for service in services {
            match self.resources.tag_value(&service, &self.tag_name).await {
                Ok(Some(value)) => tagged.push((service, value)),
                Ok(None) => debug!(service = %service, "tag disappeared, skipping"),
                Err(e) => warn!(service = %service, error = %e, "failed to read tag, skipping"),
            }
        }
        Ok(tagged)
    }
}

/// Resolve a reference in place. Returns false when the plan ends up with no
/// schedule at all.
fn resolve(plan: &mut ServicePlan, schedules: &HashMap<String, String>) -> bool {
    if plan.needs_resolution() {
        let resolution = resolve_reference(&plan.raw_config, |name| schedules.get(name).cloned());
        plan.apply_resolution(&resolution);
    }
    if plan.effective_config().trim().is_empty() && plan.state_changes.is_empty() {
        debug!(service = %plan.service.name(), "no schedule, not under schedule control");
        return false;
    }
    true
}

fn validate(plan: &mut ServicePlan) {
    match plan.validate() {
        Ok(warnings) => {
            for warning in warnings {
                warn!(service = %plan.service.name(), %warning, "schedule warning");
            }
            debug!(service = %plan.service.name(), schedule = plan.effective_config(), "adding service plan");
        }
        Err(e) => {
            warn!(
                service = %plan.service.name(),
                schedule = plan.effective_config(),
                error = %e,
                "invalid schedule, plan disabled"
            );
        }
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
