// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in units.

mod base;
mod grid;
mod grid_base;
mod grid_status;
mod grid_submit;
mod pr_hook;
mod source_host;
mod status_notify;

pub use base::{Base, DEFAULT_RC_FILE};
pub use grid::Grid;
pub use grid_base::GridBase;
pub use grid_status::GridStatus;
pub use grid_submit::GridSubmit;
pub use pr_hook::PrHook;
pub use source_host::SourceHost;
pub use status_notify::{status_report, StatusNotify};

use crate::registry::{Registry, RegistryError};
use std::sync::Arc;

pub const BASE: &str = "base";
pub const SOURCE_HOST: &str = "source-host";
pub const PR_HOOK: &str = "pr-hook";
pub const GRID_BASE: &str = "grid-base";
pub const GRID_SUBMIT: &str = "grid-submit";
pub const GRID_STATUS: &str = "grid-status";
pub const STATUS_NOTIFY: &str = "status-notify";
pub const GRID: &str = "grid";

/// Units activated when neither the command line nor the run-control file
/// names any.
pub const DEFAULT_UNITS: &[&str] = &[BASE, PR_HOOK, GRID, STATUS_NOTIFY];

/// Route owned by the pull-request webhook unit.
pub const HOOK_ROUTE: &str = "/hook";
/// Route the grid's hook scripts report status to.
pub const STATUS_ROUTE: &str = "/gridstatus";

/// Registry holding every built-in unit, in registration order.
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    registry.register(Arc::new(Base::new()))?;
    registry.register(Arc::new(SourceHost::new()))?;
    registry.register(Arc::new(PrHook::new()))?;
    registry.register(Arc::new(GridBase::new()))?;
    registry.register(Arc::new(GridSubmit::new()))?;
    registry.register(Arc::new(GridStatus::new()))?;
    registry.register(Arc::new(StatusNotify::new()))?;
    registry.register(Arc::new(Grid::new()))?;
    Ok(registry)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
