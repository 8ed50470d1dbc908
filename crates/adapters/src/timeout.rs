// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-call deadline around a resource manager

use crate::resource::{ResourceError, ResourceManager, ServiceStatus, TaskRef};
use async_trait::async_trait;
use oh_core::ServiceRef;
use std::future::Future;
use std::time::Duration;

/// Wraps every call of the inner manager in `tokio::time::timeout`.
///
/// Without a deadline calls pass straight through.
#[derive(Clone, Debug)]
pub struct TimeoutResourceManager<R> {
    inner: R,
    deadline: Option<Duration>,
}

impl<R: ResourceManager> TimeoutResourceManager<R> {
    pub fn new(inner: R, deadline: Option<Duration>) -> Self {
        Self { inner, deadline }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, ResourceError>
    where
        F: Future<Output = Result<T, ResourceError>> + Send,
    {
        let Some(deadline) = self.deadline else {
            return call.await;
        };
        match tokio::time::timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                let after_ms = deadline.as_millis() as u64;
                tracing::warn!(operation, after_ms, "resource manager call timed out");
                Err(ResourceError::Timeout { operation, after_ms })
            }
        }
    }
}

#[async_trait]
impl<R: ResourceManager> ResourceManager for TimeoutResourceManager<R> {
    async fn list_services(&self, tag: Option<&str>) -> Result<Vec<ServiceRef>, ResourceError> {
        self.bounded("list_services", self.inner.list_services(tag)).await
    }

    async fn tag_value(
        &self,
        service: &ServiceRef,
        tag: &str,
    ) -> Result<Option<String>, ResourceError> {
        self.bounded("tag_value", self.inner.tag_value(service, tag)).await
    }

    async fn describe(&self, service: &ServiceRef) -> Result<ServiceStatus, ResourceError> {
        self.bounded("describe", self.inner.describe(service)).await
    }

    async fn set_desired_count(&self, service: &ServiceRef, count: u32) -> Result<(), ResourceError> {
        self.bounded("set_desired_count", self.inner.set_desired_count(service, count)).await
    }

    async fn running_tasks(&self, service: &ServiceRef) -> Result<Vec<TaskRef>, ResourceError> {
        self.bounded("running_tasks", self.inner.running_tasks(service)).await
    }

    async fn stop_task(&self, service: &ServiceRef, task: &TaskRef) -> Result<(), ResourceError> {
        self.bounded("stop_task", self.inner.stop_task(service, task)).await
    }
}

#[cfg(test)]
#[path = "timeout_tests.rs"]
mod tests;
