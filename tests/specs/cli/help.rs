// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output for both binaries.

use crate::prelude::*;

#[test]
fn grd_version_prints_the_version() {
    Project::empty().grd().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn grd_help_lists_flags() {
    Project::empty()
        .grd()
        .args(&["--help"])
        .passes()
        .stdout_has("--units")
        .stdout_has("--rc")
        .stdout_has("--set")
        .stdout_has("report");
}

#[test]
fn gr_help_lists_commands() {
    Project::empty()
        .gr()
        .args(&["--help"])
        .passes()
        .stdout_has("emit")
        .stdout_has("deliver")
        .stdout_has("jobs")
        .stdout_has("status")
        .stdout_has("shutdown");
}

#[test]
fn gr_without_a_command_is_a_usage_error() {
    Project::empty().gr().fails_with(2).stderr_has("Usage:");
}
