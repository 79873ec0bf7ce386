// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability units: the extension mechanism of the relay.
//!
//! A unit is described by a [`UnitDescriptor`] (name, required units,
//! configuration defaults, an optional route and the events it runs for)
//! and implemented by the [`Unit`] trait.

use crate::context::Context;
use async_trait::async_trait;
use gr_adapters::{NotifyError, RemoteError};
use gr_core::{ConfigError, ConfigStore, Event, EventName, PayloadError, Updater};
use gr_storage::CacheError;
use std::fmt;
use thiserror::Error;

/// Errors raised by a unit's setup, intake or execute step
#[derive(Debug, Error)]
pub enum UnitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("job cache: {0}")]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("notify: {0}")]
    Notify(#[from] NotifyError),
    #[error("remote: {0}")]
    Remote(#[from] RemoteError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Static description of a unit, registered once at startup.
#[derive(Clone)]
pub struct UnitDescriptor {
    pub name: String,
    pub requires: Vec<String>,
    pub defaults: ConfigStore,
    pub updaters: Vec<(String, Updater)>,
    /// Route on the front end whose payloads this unit turns into events.
    pub route: Option<String>,
    /// Events this unit executes for; empty means never.
    pub runs_for: Vec<EventName>,
}

impl UnitDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            defaults: ConfigStore::new(),
            updaters: Vec::new(),
            route: None,
            runs_for: Vec::new(),
        }
    }

    gr_core::chain_setters! {
        set {
            defaults: ConfigStore,
        }
        option {
            route: String,
        }
    }

    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn runs_for<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.runs_for.extend(events.into_iter().map(EventName::new));
        self
    }

    pub fn updater(mut self, option: impl Into<String>, updater: Updater) -> Self {
        self.updaters.push((option.into(), updater));
        self
    }

    /// Whether this unit executes for `event`.
    pub fn interested_in(&self, event: &EventName) -> bool {
        self.runs_for.iter().any(|name| name == event)
    }
}

impl fmt::Debug for UnitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitDescriptor")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("defaults", &self.defaults)
            .field("updaters", &self.updaters.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .field("route", &self.route)
            .field("runs_for", &self.runs_for)
            .finish()
    }
}

/// A capability unit.
///
/// Only [`descriptor`](Unit::descriptor) is required. Units that only
/// contribute configuration keep the no-op defaults.
#[async_trait]
pub trait Unit: Send + Sync + 'static {
    fn descriptor(&self) -> &UnitDescriptor;

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Validate the merged configuration and fill derived defaults.
    ///
    /// Called once at startup, in resolution order.
    fn setup(&self, _config: &mut ConfigStore) -> Result<(), UnitError> {
        Ok(())
    }

    /// Turn a payload delivered on this unit's route into an event.
    ///
    /// `Ok(None)` means the payload is acknowledged and ignored.
    fn intake(&self, _payload: &serde_json::Value) -> Result<Option<Event>, UnitError> {
        Ok(None)
    }

    /// Handle the context's current event.
    async fn execute(&self, _ctx: &mut Context) -> Result<(), UnitError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "unit_tests.rs"]
mod tests;
