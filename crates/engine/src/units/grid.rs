// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{GRID, GRID_STATUS, GRID_SUBMIT};
use crate::unit::{Unit, UnitDescriptor};

/// Pulls in job submission and status reconciliation together.
pub struct Grid {
    descriptor: UnitDescriptor,
}

impl Grid {
    pub fn new() -> Self {
        Self { descriptor: UnitDescriptor::new(GRID).requires([GRID_SUBMIT, GRID_STATUS]) }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit for Grid {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }
}
