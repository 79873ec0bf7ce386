// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup planning: pick the units, resolve them, and layer the options.
//!
//! Precedence, lowest first: unit defaults in resolution order, the
//! run-control file, the command line.

use std::path::PathBuf;
use std::sync::Arc;

use gr_core::ConfigStore;
use gr_engine::units::{DEFAULT_RC_FILE, GRID_BASE, GRID_SUBMIT, SOURCE_HOST};
use gr_engine::{
    apply_defaults, builtin_registry, setup_units, GridConfig, ServerConfig, SourceConfig,
    SubmitConfig, Unit, DEFAULT_UNITS,
};

use crate::args::Args;
use crate::lifecycle::LifecycleError;
use crate::rc;

/// Resolved units plus the merged (not yet validated) configuration.
pub struct Plan {
    pub order: Vec<Arc<dyn Unit>>,
    pub config: ConfigStore,
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan")
            .field("units", &self.unit_names())
            .field("config", &self.config)
            .finish()
    }
}

/// Typed views over the validated configuration, one per active concern.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub source: Option<SourceConfig>,
    pub grid: Option<GridConfig>,
    pub submit: Option<SubmitConfig>,
}

impl Plan {
    /// Load the run-control file named on the command line (or the default)
    /// and build the plan from it.
    pub fn configure(args: &Args) -> Result<Self, LifecycleError> {
        let path = args.rc.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_RC_FILE));
        let file = rc::load(&path)?;
        Self::build(&file, &args.config())
    }

    pub fn build(file: &ConfigStore, cli: &ConfigStore) -> Result<Self, LifecycleError> {
        let units = unit_list(file, cli)?;
        let order = builtin_registry()?.resolve(units.as_slice())?;

        let mut config = ConfigStore::new();
        apply_defaults(&order, &mut config);
        config.merge(file);
        config.merge(cli);
        Ok(Self { order, config })
    }

    pub fn unit_names(&self) -> Vec<&str> {
        self.order.iter().map(|u| u.name()).collect()
    }

    fn is_active(&self, name: &str) -> bool {
        self.order.iter().any(|u| u.name() == name)
    }

    /// Run every unit's setup, then build the typed views.
    pub fn setup(&mut self) -> Result<Settings, LifecycleError> {
        setup_units(&self.order, &mut self.config)?;
        let config = &self.config;
        Ok(Settings {
            server: ServerConfig::from_store(config)?,
            source: self
                .is_active(SOURCE_HOST)
                .then(|| SourceConfig::from_store(config))
                .transpose()?,
            grid: self.is_active(GRID_BASE).then(|| GridConfig::from_store(config)).transpose()?,
            submit: self
                .is_active(GRID_SUBMIT)
                .then(|| SubmitConfig::from_store(config))
                .transpose()?,
        })
    }
}

/// Units to activate: command line, then run-control file, then the defaults.
fn unit_list(file: &ConfigStore, cli: &ConfigStore) -> Result<Vec<String>, LifecycleError> {
    for store in [cli, file] {
        if store.contains("units") {
            return Ok(store.list("units")?);
        }
    }
    Ok(DEFAULT_UNITS.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
