// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job records: one outstanding remote build per pull request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique key of the request that triggered a build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobKey {
    pub owner: String,
    pub repository: String,
    pub number: u64,
}

impl JobKey {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>, number: u64) -> Self {
        Self { owner: owner.into(), repository: repository.into(), number }
    }

    /// Deterministic directory name for this key's remote working directory.
    pub fn dir_name(&self) -> String {
        format!("{}--{}--{}", self.owner, self.repository, self.number)
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}

/// Durable state of a submitted build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Identifier assigned by the grid scheduler; used to cancel.
    pub grid_id: String,
    pub report_url: String,
    /// Remote working directory, relative to the login directory unless absolute.
    pub working_dir: String,
    /// Free-form data written by the submitting unit.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl JobRecord {
    pub fn new(
        grid_id: impl Into<String>,
        report_url: impl Into<String>,
        working_dir: impl Into<String>,
    ) -> Self {
        Self {
            grid_id: grid_id.into(),
            report_url: report_url.into(),
            working_dir: working_dir.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

crate::test_builder! {
    pub struct JobRecordBuilder => JobRecord {
        into {
            grid_id: String = "778",
            report_url: String = "https://grid.example/report/778",
            working_dir: String = "acme--widget--42",
        }
        set {
            metadata: BTreeMap<String, String> = BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
