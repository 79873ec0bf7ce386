// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Options every relay needs: run control, logging and the public URL.

use super::{BASE, DEFAULT_UNITS};
use crate::settings::ServerConfig;
use crate::unit::{Unit, UnitDescriptor, UnitError};
use gr_core::{concat_lists, ConfigStore, Value};

/// Default run-control file, relative to the working directory.
pub const DEFAULT_RC_FILE: &str = "gridrelay.toml";

pub struct Base {
    descriptor: UnitDescriptor,
}

impl Base {
    pub fn new() -> Self {
        let defaults = ConfigStore::from_pairs([
            ("rc", Value::from(DEFAULT_RC_FILE)),
            ("units", Value::from(DEFAULT_UNITS)),
            ("debug", Value::Bool(false)),
            ("verbose", Value::Bool(false)),
            ("server_url", Value::from("http://localhost")),
            ("port", Value::Int(8080)),
            ("log_directives", Value::List(Vec::new())),
        ]);
        Self {
            descriptor: UnitDescriptor::new(BASE)
                .defaults(defaults)
                .updater("log_directives", concat_lists()),
        }
    }
}

impl Default for Base {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit for Base {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    fn setup(&self, config: &mut ConfigStore) -> Result<(), UnitError> {
        ServerConfig::from_store(config)?;
        Ok(())
    }
}
