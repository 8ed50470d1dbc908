// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource manager collaborator: inventory, status and scaling of
//! remotely managed services.

use async_trait::async_trait;
use oh_core::{ActualState, ServiceRef};
use serde::Serialize;
use thiserror::Error;

/// Errors from resource manager operations
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("service not found: {0}")]
    NotFound(ServiceRef),
    #[error("failed to list services: {0}")]
    List(String),
    #[error("failed to describe {service}: {message}")]
    Describe { service: ServiceRef, message: String },
    #[error("failed to update {service}: {message}")]
    Mutation { service: ServiceRef, message: String },
    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: &'static str, after_ms: u64 },
}

/// Observed state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceStatus {
    pub state: ActualState,
    pub running_count: u32,
    pub desired_count: u32,
}

impl ServiceStatus {
    pub fn unknown() -> Self {
        Self { state: ActualState::Unknown, running_count: 0, desired_count: 0 }
    }
}

/// Identifier of one running instance (task) of a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskRef(pub String);

impl std::fmt::Display for TaskRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Adapter for the remote resource manager.
///
/// Retries and session handling belong to implementations; callers issue
/// each call once.
#[async_trait]
pub trait ResourceManager: Clone + Send + Sync + 'static {
    /// Enumerate managed services, optionally only those carrying `tag`.
    async fn list_services(&self, tag: Option<&str>) -> Result<Vec<ServiceRef>, ResourceError>;

    /// Value of `tag` on `service`, `None` when the tag is absent.
    async fn tag_value(&self, service: &ServiceRef, tag: &str)
        -> Result<Option<String>, ResourceError>;

    /// Current desired/running counts and state of `service`.
    async fn describe(&self, service: &ServiceRef) -> Result<ServiceStatus, ResourceError>;

    async fn set_desired_count(&self, service: &ServiceRef, count: u32)
        -> Result<(), ResourceError>;

    async fn running_tasks(&self, service: &ServiceRef) -> Result<Vec<TaskRef>, ResourceError>;

    /// Force-terminate one running instance.
    async fn stop_task(&self, service: &ServiceRef, task: &TaskRef) -> Result<(), ResourceError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ResourceError, ResourceManager, ServiceStatus, TaskRef};
    use async_trait::async_trait;
    use oh_core::{ActualState, ServiceRef};
    use parking_lot::Mutex;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;

    /// Recorded resource manager call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ResourceCall {
        ListServices { tag: Option<String> },
        TagValue { service: ServiceRef, tag: String },
        Describe { service: ServiceRef },
        SetDesiredCount { service: ServiceRef, count: u32 },
        RunningTasks { service: ServiceRef },
        StopTask { service: ServiceRef, task: TaskRef },
    }

    impl ResourceCall {
        /// True for calls that change remote state
        pub fn is_mutation(&self) -> bool {
            matches!(self, ResourceCall::SetDesiredCount { .. } | ResourceCall::StopTask { .. })
        }
    }

    #[derive(Debug, Clone)]
    struct FakeService {
        tags: BTreeMap<String, String>,
        state: ActualState,
        desired_count: u32,
        tasks: Vec<TaskRef>,
        next_task: u32,
    }

    impl FakeService {
        fn spawn_tasks(&mut self, service: &ServiceRef, count: u32) {
            while self.tasks.len() < count as usize {
                self.next_task += 1;
                self.tasks.push(TaskRef(format!("{}/task-{}", service.name(), self.next_task)));
            }
        }

        fn status(&self) -> ServiceStatus {
            ServiceStatus {
                state: self.state,
                running_count: self.tasks.len() as u32,
                desired_count: self.desired_count,
            }
        }
    }

    #[derive(Default)]
    struct FakeResourceState {
        services: BTreeMap<ServiceRef, FakeService>,
        calls: Vec<ResourceCall>,
        failing_describe: HashSet<ServiceRef>,
        failing_mutation: HashSet<ServiceRef>,
        failing_list: bool,
        /// Scaling down leaves tasks running until stopped explicitly
        sticky_tasks: bool,
    }

    /// Fake resource manager for testing.
    ///
    /// Scaling converges immediately: `set_desired_count` starts or drops
    /// tasks to match, unless [`FakeResourceManager::keep_tasks_on_scale_down`]
    /// is set.
    #[derive(Clone, Default)]
    pub struct FakeResourceManager {
        inner: Arc<Mutex<FakeResourceState>>,
    }

    impl FakeResourceManager {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a stopped service with no tags
        pub fn add_service(&self, service: impl Into<ServiceRef>) -> &Self {
            self.inner.lock().services.insert(
                service.into(),
                FakeService {
                    tags: BTreeMap::new(),
                    state: ActualState::Stopped,
                    desired_count: 0,
                    tasks: Vec::new(),
                    next_task: 0,
                },
            );
            self
        }

        /// Register a service with one tag
        pub fn add_tagged_service(
            &self,
            service: impl Into<ServiceRef>,
            tag: &str,
            value: &str,
        ) -> &Self {
            let service = service.into();
            self.add_service(service.clone());
            self.set_tag(&service, tag, value);
            self
        }

        pub fn set_tag(&self, service: &ServiceRef, tag: &str, value: &str) {
            if let Some(s) = self.inner.lock().services.get_mut(service) {
                s.tags.insert(tag.to_string(), value.to_string());
            }
        }

        /// Script the observed state of a service
        pub fn set_running(&self, service: &ServiceRef, count: u32) {
            let mut inner = self.inner.lock();
            if let Some(s) = inner.services.get_mut(service) {
                s.tasks.clear();
                s.spawn_tasks(service, count);
                s.desired_count = count;
                s.state = if count > 0 { ActualState::Running } else { ActualState::Stopped };
            }
        }

        /// Script an unobtainable status
        pub fn set_unknown(&self, service: &ServiceRef) {
            if let Some(s) = self.inner.lock().services.get_mut(service) {
                s.state = ActualState::Unknown;
            }
        }

        pub fn fail_describe(&self, service: &ServiceRef) {
            self.inner.lock().failing_describe.insert(service.clone());
        }

        pub fn fail_mutation(&self, service: &ServiceRef) {
            self.inner.lock().failing_mutation.insert(service.clone());
        }

        pub fn fail_list(&self) {
            self.inner.lock().failing_list = true;
        }

        pub fn keep_tasks_on_scale_down(&self) {
            self.inner.lock().sticky_tasks = true;
        }

        /// Current status as the fake sees it, without recording a call
        pub fn status(&self, service: &ServiceRef) -> Option<ServiceStatus> {
            self.inner.lock().services.get(service).map(FakeService::status)
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<ResourceCall> {
            self.inner.lock().calls.clone()
        }

        /// Recorded calls that change remote state
        pub fn mutations(&self) -> Vec<ResourceCall> {
            self.inner.lock().calls.iter().filter(|c| c.is_mutation()).cloned().collect()
        }

        pub fn clear_calls(&self) {
            self.inner.lock().calls.clear();
        }
    }

    #[async_trait]
    impl ResourceManager for FakeResourceManager {
        async fn list_services(
            &self,
            tag: Option<&str>,
        ) -> Result<Vec<ServiceRef>, ResourceError> {
            let mut inner = self.inner.lock();
            inner.calls.push(ResourceCall::ListServices { tag: tag.map(str::to_string) });
            if inner.failing_list {
                return Err(ResourceError::List("scripted failure".to_string()));
            }
            Ok(inner
                .services
                .iter()
                .filter(|(_, s)| tag.map_or(true, |t| s.tags.contains_key(t)))
                .map(|(service, _)| service.clone())
                .collect())
        }

        async fn tag_value(
            &self,
            service: &ServiceRef,
            tag: &str,
        ) -> Result<Option<String>, ResourceError> {
            let mut inner = self.inner.lock();
            inner
                .calls
                .push(ResourceCall::TagValue { service: service.clone(), tag: tag.to_string() });
            match inner.services.get(service) {
                Some(s) => Ok(s.tags.get(tag).cloned()),
                None => Err(ResourceError::NotFound(service.clone())),
            }
        }

        async fn describe(&self, service: &ServiceRef) -> Result<ServiceStatus, ResourceError> {
            let mut inner = self.inner.lock();
            inner.calls.push(ResourceCall::Describe { service: service.clone() });
            if inner.failing_describe.contains(service) {
                return Err(ResourceError::Describe {
                    service: service.clone(),
                    message: "scripted failure".to_string(),
                });
            }
            match inner.services.get(service) {
                Some(s) => Ok(s.status()),
                None => Err(ResourceError::NotFound(service.clone())),
            }
        }

        async fn set_desired_count(
            &self,
            service: &ServiceRef,
            count: u32,
        ) -> Result<(), ResourceError> {
            let mut inner = self.inner.lock();
            inner.calls.push(ResourceCall::SetDesiredCount { service: service.clone(), count });
            if inner.failing_mutation.contains(service) {
                return Err(ResourceError::Mutation {
                    service: service.clone(),
                    message: "scripted failure".to_string(),
                });
            }
            let sticky = inner.sticky_tasks;
            let Some(s) = inner.services.get_mut(service) else {
                return Err(ResourceError::NotFound(service.clone()));
            };
            s.desired_count = count;
            if (count as usize) > s.tasks.len() {
                s.spawn_tasks(service, count);
            } else if !sticky {
                s.tasks.truncate(count as usize);
            }
            s.state = if s.tasks.is_empty() { ActualState::Stopped } else { ActualState::Running };
            Ok(())
        }

        async fn running_tasks(&self, service: &ServiceRef) -> Result<Vec<TaskRef>, ResourceError> {
            let mut inner = self.inner.lock();
            inner.calls.push(ResourceCall::RunningTasks { service: service.clone() });
            match inner.services.get(service) {
                Some(s) => Ok(s.tasks.clone()),
                None => Err(ResourceError::NotFound(service.clone())),
            }
        }

        async fn stop_task(&self, service: &ServiceRef, task: &TaskRef) -> Result<(), ResourceError> {
            let mut inner = self.inner.lock();
            inner
                .calls
                .push(ResourceCall::StopTask { service: service.clone(), task: task.clone() });
            if inner.failing_mutation.contains(service) {
                return Err(ResourceError::Mutation {
                    service: service.clone(),
                    message: "scripted failure".to_string(),
                });
            }
            let Some(s) = inner.services.get_mut(service) else {
                return Err(ResourceError::NotFound(service.clone()));
            };
            s.tasks.retain(|t| t != task);
            if s.tasks.is_empty() {
                s.state = ActualState::Stopped;
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResourceManager, ResourceCall};

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
