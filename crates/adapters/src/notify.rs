// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use gr_core::Status;
use serde::Serialize;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// A commit status to publish on the source host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub owner: String,
    pub repository: String,
    pub number: u64,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    pub description: String,
}

/// Adapter for relaying build status to the source host
#[async_trait]
pub trait StatusNotifier: Send + Sync + 'static {
    async fn notify(&self, report: &StatusReport) -> Result<(), NotifyError>;
}

/// Notifier that records each relay in the daemon log.
///
/// Stands in for the source-host API client, which lives outside this
/// workspace.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatusNotifier for LogNotifier {
    async fn notify(&self, report: &StatusReport) -> Result<(), NotifyError> {
        tracing::info!(
            repo = %format!("{}/{}", report.owner, report.repository),
            number = report.number,
            status = %report.status,
            target_url = report.target_url.as_deref().unwrap_or(""),
            description = %report.description,
            "relaying build status"
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyError, StatusNotifier, StatusReport};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeNotifyState {
        calls: Vec<StatusReport>,
        fail_with: Option<String>,
    }

    /// Fake status notifier for testing
    #[derive(Clone, Default)]
    pub struct FakeStatusNotifier {
        inner: Arc<Mutex<FakeNotifyState>>,
    }

    impl FakeStatusNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded reports
        pub fn calls(&self) -> Vec<StatusReport> {
            self.inner.lock().calls.clone()
        }

        /// Make subsequent sends fail.
        pub fn fail_with(&self, reason: &str) {
            self.inner.lock().fail_with = Some(reason.to_string());
        }
    }

    #[async_trait]
    impl StatusNotifier for FakeStatusNotifier {
        async fn notify(&self, report: &StatusReport) -> Result<(), NotifyError> {
            let mut state = self.inner.lock();
            state.calls.push(report.clone());
            match &state.fail_with {
                Some(reason) => Err(NotifyError::SendFailed(reason.clone())),
                None => Ok(()),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusNotifier;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
