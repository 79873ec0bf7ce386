// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Relays reconciled status to the source host.

use super::{SOURCE_HOST, STATUS_NOTIFY};
use crate::context::Context;
use crate::settings::SourceConfig;
use crate::unit::{Unit, UnitDescriptor, UnitError};
use async_trait::async_trait;
use gr_adapters::StatusReport;
use gr_core::event::STATUS_RELAY;
use gr_core::StatusPayload;
use std::sync::Arc;

pub struct StatusNotify {
    descriptor: UnitDescriptor,
}

impl StatusNotify {
    pub fn new() -> Self {
        Self {
            descriptor: UnitDescriptor::new(STATUS_NOTIFY)
                .requires([SOURCE_HOST])
                .runs_for([STATUS_RELAY]),
        }
    }
}

impl Default for StatusNotify {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the report for `payload`, falling back to the status's default
/// description and dropping a blank URL.
pub fn status_report(source: &SourceConfig, payload: &StatusPayload) -> StatusReport {
    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(payload.status.description());
    StatusReport {
        owner: source.owner.clone(),
        repository: source.repository.clone(),
        number: payload.number,
        status: payload.status,
        target_url: payload.target_url.clone().filter(|_| payload.has_target_url()),
        description: description.to_string(),
    }
}

#[async_trait]
impl Unit for StatusNotify {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    async fn execute(&self, ctx: &mut Context) -> Result<(), UnitError> {
        let payload = ctx.current_event()?.status()?;
        let source = SourceConfig::from_store(&ctx.config)?;
        let report = status_report(&source, &payload);
        let notifier = Arc::clone(&ctx.deps.notifier);
        notifier.notify(&report).await?;
        tracing::debug!(number = report.number, status = %report.status, "status relayed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "status_notify_tests.rs"]
mod tests;
