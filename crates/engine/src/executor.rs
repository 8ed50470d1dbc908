// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action executor

use crate::action::Action;
use oh_adapters::{ResourceError, ResourceManager};
use thiserror::Error;

/// Errors that can occur during action execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("resource manager error: {0}")]
    Resource(#[from] ResourceError),
    #[error("no service was given")]
    MissingService,
}

/// Executes actions against the resource manager
#[derive(Clone)]
pub struct Executor<R> {
    resources: R,
}

impl<R: ResourceManager> Executor<R> {
    pub fn new(resources: R) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// Execute a single action with tracing
    pub async fn execute(&self, action: &Action) -> Result<(), ExecuteError> {
        // Format the fields as `key=val`
        let info = {
            let fields = action.fields();
            let cap = fields.iter().map(|(a, b)| a.len() + b.len() + 2).sum();
            let mut fmt = String::with_capacity(cap);
            for (key, val) in fields {
                fmt.push_str(key);
                fmt.push('=');
                fmt.push_str(&val);
                fmt.push(' ');
            }
            fmt.pop();
            fmt
        };

        let op = action.name();
        let verbose = action.verbose();
        if verbose {
            tracing::info!("executing action={} {}", op, info);
        }

        let start = std::time::Instant::now();
        let result = self.execute_inner(action).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if verbose {
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "completed"),
                Err(e) => tracing::error!(error = %e, elapsed_ms, "failed"),
            }
        } else {
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "executed action={} {}", op, info),
                Err(e) => tracing::error!(error = %e, elapsed_ms, "error action={} {}", op, info),
            }
        }

        result
    }

    /// Execute actions in order, stopping at the first failure
    pub async fn execute_all(&self, actions: &[Action]) -> Result<(), ExecuteError> {
        for action in actions {
            self.execute(action).await?;
        }
        Ok(())
    }

    async fn execute_inner(&self, action: &Action) -> Result<(), ExecuteError> {
        if action.service().is_empty() {
            return Err(ExecuteError::MissingService);
        }
        match action {
            Action::SetDesiredCount { service, count } => {
                self.resources.set_desired_count(service, *count).await?;
            }
            Action::StopRunningTasks { service } => {
                let tasks = self.resources.running_tasks(service).await?;
                for task in &tasks {
                    tracing::debug!(service = %service.name(), task = %task, "stopping task");
                    self.resources.stop_task(service, task).await?;
                }
                if !tasks.is_empty() {
                    tracing::info!(service = %service.name(), stopped = tasks.len(), "stopped running tasks");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
