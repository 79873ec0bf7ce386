// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime: the resolved units plus the context they share.

use crate::context::Context;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::registry::route_owner;
use crate::unit::{Unit, UnitError};
use gr_core::{ConfigStore, Event, JobKey, JobRecord};
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;

/// Errors from feeding the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no active unit owns route '{0}'")]
    UnknownRoute(String),
    #[error("unit '{unit}' rejected payload: {source}")]
    Intake {
        unit: String,
        #[source]
        source: UnitError,
    },
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Owns the dispatcher and the context for one relay process.
pub struct Runtime {
    dispatcher: Dispatcher,
    ctx: Context,
}

impl Runtime {
    pub fn new(order: Vec<Arc<dyn Unit>>, ctx: Context) -> Self {
        Self { dispatcher: Dispatcher::new(order), ctx }
    }

    /// Active unit names in resolution order.
    pub fn units(&self) -> Vec<String> {
        self.dispatcher.units().iter().map(|u| u.name().to_string()).collect()
    }

    /// Routes owned by active units.
    pub fn routes(&self) -> Vec<String> {
        self.dispatcher.units().iter().filter_map(|u| u.descriptor().route.clone()).collect()
    }

    pub fn config(&self) -> &ConfigStore {
        &self.ctx.config
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    #[cfg(test)]
    pub(crate) fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Snapshot of every outstanding job.
    pub fn jobs(&self) -> Vec<(JobKey, JobRecord)> {
        self.ctx.jobs.iter().map(|(k, r)| (k.clone(), r.clone())).collect()
    }

    /// Run one dispatch pass; returns the event current at its end.
    pub async fn handle_event(&mut self, event: Event) -> Result<Event, RuntimeError> {
        Ok(self.dispatcher.dispatch(event, &mut self.ctx).await?)
    }

    /// Turn a route payload into an event without dispatching it.
    pub fn intake(
        &self,
        route: &str,
        payload: &serde_json::Value,
    ) -> Result<Option<Event>, RuntimeError> {
        let owner = route_owner(self.dispatcher.units(), route)
            .ok_or_else(|| RuntimeError::UnknownRoute(route.to_string()))?;
        owner
            .intake(payload)
            .map_err(|source| RuntimeError::Intake { unit: owner.name().to_string(), source })
    }

    /// Hand `payload` to the unit owning `route`, then dispatch whatever
    /// event it produced.
    pub async fn deliver(
        &mut self,
        route: &str,
        payload: &serde_json::Value,
    ) -> Result<Option<Event>, RuntimeError> {
        match self.intake(route, payload)? {
            Some(event) => Ok(Some(self.handle_event(event).await?)),
            None => {
                tracing::debug!(route, "payload ignored");
                Ok(None)
            }
        }
    }

    /// Human-readable dump of version, unit order, configuration and jobs.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "gridrelay {}", env!("CARGO_PKG_VERSION"));
        let _ = writeln!(out, "units: {}", self.units().join(", "));
        let _ = writeln!(out, "\nconfiguration:");
        for line in self.ctx.config.to_string().lines() {
            let _ = writeln!(out, "  {line}");
        }
        let _ = writeln!(out, "\njob cache: {}", self.ctx.jobs.path().display());
        if self.ctx.jobs.is_empty() {
            let _ = writeln!(out, "  (no jobs)");
        }
        for (key, record) in self.ctx.jobs.iter() {
            let _ = writeln!(
                out,
                "  {key}: grid_id={} report_url={} working_dir={}",
                record.grid_id, record.report_url, record.working_dir
            );
        }
        out
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
