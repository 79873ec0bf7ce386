// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status reconciliation for grid callbacks.

use super::{GRID_BASE, GRID_STATUS, SOURCE_HOST, STATUS_ROUTE};
use crate::context::Context;
use crate::settings::SourceConfig;
use crate::unit::{Unit, UnitDescriptor, UnitError};
use async_trait::async_trait;
use gr_core::event::{STATUS_RELAY, STATUS_UPDATE};
use gr_core::{Event, JobKey};
use serde_json::Value;

pub struct GridStatus {
    descriptor: UnitDescriptor,
}

impl GridStatus {
    pub fn new() -> Self {
        Self {
            descriptor: UnitDescriptor::new(GRID_STATUS)
                .requires([GRID_BASE, SOURCE_HOST])
                .route(STATUS_ROUTE)
                .runs_for([STATUS_UPDATE]),
        }
    }
}

impl Default for GridStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Unit for GridStatus {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    /// Accepts the status object itself, or a form body whose `status`
    /// field holds it as a JSON string (what the hook scripts post).
    fn intake(&self, payload: &Value) -> Result<Option<Event>, UnitError> {
        let data = match payload.get("status") {
            Some(Value::String(raw)) if raw.trim_start().starts_with('{') => {
                serde_json::from_str(raw)?
            }
            _ => payload.clone(),
        };
        let event = Event::new(STATUS_UPDATE, data);
        event.status()?;
        Ok(Some(event))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<(), UnitError> {
        let event = ctx.current_event()?;
        let status = event.status()?;
        let mut data = event.data.clone();
        let source = SourceConfig::from_store(&ctx.config)?;
        let key = JobKey::new(source.owner, source.repository, status.number);

        match ctx.jobs.get(&key).cloned() {
            Some(record) => {
                if !status.has_target_url() {
                    if let Value::Object(map) = &mut data {
                        map.insert("target_url".into(), Value::String(record.report_url.clone()));
                    }
                }
                if status.status.is_terminal() {
                    ctx.jobs.remove(&key)?;
                    tracing::info!(
                        %key,
                        status = %status.status,
                        grid_id = %record.grid_id,
                        "grid job finished"
                    );
                } else {
                    tracing::info!(%key, status = %status.status, "grid job progress");
                }
            }
            None => {
                tracing::debug!(%key, status = %status.status, "no job record, relaying as is");
            }
        }

        ctx.replace_event(Event::new(STATUS_RELAY, data));
        Ok(())
    }
}

#[cfg(test)]
#[path = "grid_status_tests.rs"]
mod tests;
