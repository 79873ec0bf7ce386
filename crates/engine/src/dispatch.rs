// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential event dispatch over the resolved unit order.

use crate::context::Context;
use crate::unit::{Unit, UnitError};
use gr_core::Event;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

/// A unit failed; later units in the pass did not run.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unit '{unit}' failed: {source}")]
    UnitFailed {
        unit: String,
        #[source]
        source: UnitError,
    },
}

impl DispatchError {
    pub fn unit(&self) -> &str {
        match self {
            DispatchError::UnitFailed { unit, .. } => unit,
        }
    }
}

/// Runs units in resolved order for each event.
#[derive(Clone)]
pub struct Dispatcher {
    order: Vec<Arc<dyn Unit>>,
}

impl Dispatcher {
    pub fn new(order: Vec<Arc<dyn Unit>>) -> Self {
        Self { order }
    }

    pub fn units(&self) -> &[Arc<dyn Unit>] {
        &self.order
    }

    /// Make `event` current and run every interested unit against it.
    ///
    /// Interest is checked against the event current at each unit's turn,
    /// so an event replaced by one unit reaches the units after it. Returns
    /// the event current when the pass ends.
    pub async fn dispatch(&self, event: Event, ctx: &mut Context) -> Result<Event, DispatchError> {
        let span = tracing::info_span!("dispatch", event = %event.name);
        async {
            tracing::debug!(summary = %event.log_summary(), "dispatching");
            ctx.replace_event(event.clone());

            for unit in &self.order {
                let Some(current) = ctx.event() else { break };
                if !unit.descriptor().interested_in(&current.name) {
                    continue;
                }
                let name = unit.name().to_string();
                let result = unit
                    .execute(ctx)
                    .instrument(tracing::info_span!("unit", name = %name))
                    .await;
                if let Err(source) = result {
                    tracing::error!(unit = %name, error = %source, "unit failed, dispatch aborted");
                    ctx.take_event();
                    return Err(DispatchError::UnitFailed { unit: name, source });
                }
            }

            let result = ctx.take_event().unwrap_or(event);
            tracing::debug!(result = %result.name, "dispatch complete");
            Ok(result)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
