// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gr-shell: remote shell command construction.
//!
//! The remote-exec boundary only accepts opaque command strings, so every
//! string sent to a grid host is built here. Arguments are always quoted;
//! only operator-supplied command prefixes are passed through verbatim.

mod command;
mod quote;
mod sed;
mod template;

#[cfg(test)]
mod test_util;

pub use command::{
    append_file, cat, cd, chmod, mkdir, remove_dir, sed_replace_line, write_file, RemoteCommand,
};
pub use quote::{is_safe, quote};
pub use sed::{sed_escape_pattern, sed_escape_replacement};
pub use template::{interpolate, interpolate_shell, VAR_PATTERN};
