// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit state threaded through every unit execution.

use crate::unit::UnitError;
use gr_adapters::{RemoteShell, StatusNotifier};
use gr_core::{ConfigStore, Event};
use gr_storage::JobCache;
use std::sync::Arc;

/// External collaborators the units talk to.
#[derive(Clone)]
pub struct RuntimeDeps {
    pub remote: Arc<dyn RemoteShell>,
    pub notifier: Arc<dyn StatusNotifier>,
}

/// Configuration, current event, job cache and adapters for one process.
pub struct Context {
    pub config: ConfigStore,
    pub jobs: JobCache,
    pub deps: RuntimeDeps,
    event: Option<Event>,
}

impl Context {
    pub fn new(config: ConfigStore, jobs: JobCache, deps: RuntimeDeps) -> Self {
        Self { config, jobs, deps, event: None }
    }

    /// The event currently being dispatched.
    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    /// Like [`event`](Self::event), for units that only run inside a dispatch.
    pub fn current_event(&self) -> Result<&Event, UnitError> {
        self.event.as_ref().ok_or_else(|| UnitError::Invalid("no event is being dispatched".into()))
    }

    /// Chain into a different event; units later in the pass see the new one.
    pub fn replace_event(&mut self, event: Event) -> Option<Event> {
        self.event.replace(event)
    }

    pub(crate) fn take_event(&mut self) -> Option<Event> {
        self.event.take()
    }
}
