// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity of a managed service.
//!
//! A service is addressed by a hierarchical resource path such as
//! `arn:aws:ecs:eu-central-1:123456789012:service/billing/billing-api`.
//! The short name and the owning cluster are derived by path decomposition.

use serde::{Deserialize, Serialize};

const SERVICE_SEGMENT: &str = ":service/";
const CLUSTER_SEGMENT: &str = ":cluster/";

/// Immutable reference to a remotely managed service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRef(String);

impl ServiceRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }

    /// Path of the owning cluster: the parent path with its `service`
    /// resource segment substituted by `cluster`.
    pub fn cluster(&self) -> String {
        let Some((parent, _)) = self.0.rsplit_once('/') else {
            return String::new();
        };
        // `rsplit_once` dropped the trailing slash, the segment lookup needs it
        let with_slash = format!("{}/", parent);
        match with_slash.rfind(SERVICE_SEGMENT) {
            Some(pos) => {
                let mut cluster = String::with_capacity(with_slash.len());
                cluster.push_str(&with_slash[..pos]);
                cluster.push_str(CLUSTER_SEGMENT);
                cluster.push_str(&with_slash[pos + SERVICE_SEGMENT.len()..]);
                cluster.pop();
                cluster
            }
            None => parent.to_string(),
        }
    }

    /// Short name of the owning cluster.
    pub fn cluster_name(&self) -> String {
        let cluster = self.cluster();
        match cluster.rsplit_once('/') {
            Some((_, name)) => name.to_string(),
            None => cluster,
        }
    }
}

impl std::fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ServiceRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ServiceRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
