// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use gr_core::{JobKey, JobRecord};
use serde::{Deserialize, Serialize};

/// One job cache entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobEntry {
    pub key: JobKey,
    pub record: JobRecord,
}

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Health check response
    Pong,

    /// Event or delivery was queued (`accepted: false` when nothing consumed it)
    Event { accepted: bool },

    /// Job cache contents
    Jobs { jobs: Vec<JobEntry> },

    /// Daemon status
    Status { uptime_secs: u64, units: Vec<String>, jobs_active: usize },

    /// Daemon is shutting down
    ShuttingDown,

    /// Request failed
    Error { message: String },
}
