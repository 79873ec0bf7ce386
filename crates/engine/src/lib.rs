// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gr-engine: units, resolution, dispatch and the grid job lifecycle

mod context;
pub mod control_files;
mod dispatch;
mod registry;
mod runtime;
pub mod settings;
mod unit;
pub mod units;

#[cfg(test)]
mod test_helpers;

pub use context::{Context, RuntimeDeps};
pub use dispatch::{DispatchError, Dispatcher};
pub use registry::{apply_defaults, route_owner, setup_units, Registry, RegistryError, SetupError};
pub use runtime::{Runtime, RuntimeError};
pub use settings::{GridConfig, ServerConfig, SourceConfig, SubmitConfig};
pub use unit::{Unit, UnitDescriptor, UnitError};
pub use units::{builtin_registry, DEFAULT_UNITS};
