// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection settings for the grid's submit host.

use super::{BASE, GRID_BASE};
use crate::settings::GridConfig;
use crate::unit::{Unit, UnitDescriptor, UnitError};
use gr_core::{ConfigStore, Value};

pub struct GridBase {
    descriptor: UnitDescriptor,
}

impl GridBase {
    pub fn new() -> Self {
        let defaults = ConfigStore::from_pairs([
            ("grid_host", Value::Unset),
            ("grid_port", Value::Int(22)),
            ("grid_user", Value::Unset),
            ("grid_ssh_key", Value::Unset),
            ("grid_jobs_cache", Value::from("jobs.cache")),
            ("grid_command_timeout_secs", Value::Int(300)),
        ]);
        Self { descriptor: UnitDescriptor::new(GRID_BASE).requires([BASE]).defaults(defaults) }
    }
}

impl Default for GridBase {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit for GridBase {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    /// Falls back to the local login name for `grid_user`.
    fn setup(&self, config: &mut ConfigStore) -> Result<(), UnitError> {
        if !config.is_set("grid_user") {
            if let Ok(user) = std::env::var("USER") {
                tracing::debug!(%user, "grid_user not set, using login name");
                config.set("grid_user", user);
            }
        }
        GridConfig::from_store(config)?;
        Ok(())
    }
}
