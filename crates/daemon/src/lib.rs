// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gridrelay daemon library
//!
//! Startup planning, lifecycle, the engine loop and the socket listener
//! behind `grd`, plus the paths clients use to reach it.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod args;
pub mod engine;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod logging;
pub mod plan;
pub mod rc;

#[cfg(test)]
mod test_helpers;

pub use args::{Args, Command};
pub use lifecycle::{Config, DaemonState, LifecycleError, StartupResult};
pub use plan::{Plan, Settings};
