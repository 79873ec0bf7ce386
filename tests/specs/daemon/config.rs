// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration errors stop `grd` before it binds; `grd report` dumps the plan.

use crate::prelude::*;

#[test]
fn missing_required_option_exits_non_zero() {
    let project = Project::empty();
    project
        .grd()
        .fails_with(1)
        .stderr_has("unit 'source-host' setup failed: required option 'repo_owner' is not set");
    assert!(!project.state_dir().join("daemon.sock").exists());
}

#[test]
fn unknown_unit_exits_non_zero() {
    Project::configured()
        .grd()
        .args(&["--units", "base,jenkins"])
        .fails_with(1)
        .stderr_has("unknown unit 'jenkins'");
}

#[test]
fn malformed_rc_exits_non_zero() {
    let project = Project::empty();
    project.file("gridrelay.toml", "[grid]\nhost = \"submit.grid.example\"\n");
    project.grd().fails_with(1).stderr_has("option 'grid' cannot be a table");
}

#[test]
fn bad_override_is_a_usage_error() {
    Project::configured().grd().args(&["--set", "grid_port"]).fails_with(2);
}

#[test]
fn report_shows_units_config_and_jobs() {
    Project::configured()
        .grd()
        .args(&["report"])
        .passes()
        .stdout_has(&format!("gridrelay {}", env!("CARGO_PKG_VERSION")))
        .stdout_has(
            "units: base, source-host, pr-hook, grid-base, grid-submit, grid-status, \
             status-notify, grid",
        )
        .stdout_has("repo_owner = \"acme\"")
        .stdout_has("(no jobs)");
}

#[test]
fn report_honors_rc_and_overrides() {
    let project = Project::empty();
    project.file("relay.toml", RC);
    project
        .grd()
        .args(&["--rc", "relay.toml", "--units", "base,pr-hook", "--set", "port=9090", "report"])
        .passes()
        .stdout_has("units: base, source-host, pr-hook\n")
        .stdout_has("port = 9090");
}
