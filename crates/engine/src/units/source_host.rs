// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The source-hosting repository this relay builds for.

use super::{BASE, SOURCE_HOST};
use crate::settings::SourceConfig;
use crate::unit::{Unit, UnitDescriptor, UnitError};
use gr_core::{ConfigStore, Value};

pub struct SourceHost {
    descriptor: UnitDescriptor,
}

impl SourceHost {
    pub fn new() -> Self {
        let defaults = ConfigStore::from_pairs([
            ("repo_owner", Value::Unset),
            ("repo_name", Value::Unset),
            ("source_events", Value::from(&["pull_request"][..])),
        ]);
        Self { descriptor: UnitDescriptor::new(SOURCE_HOST).requires([BASE]).defaults(defaults) }
    }
}

impl Default for SourceHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit for SourceHost {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    fn setup(&self, config: &mut ConfigStore) -> Result<(), UnitError> {
        SourceConfig::from_store(config)?;
        Ok(())
    }
}
