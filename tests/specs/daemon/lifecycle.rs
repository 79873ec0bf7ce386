// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A running daemon answers the client and shuts down on request.

use crate::prelude::*;

#[test]
fn daemon_serves_the_client_until_shutdown() {
    let project = Project::configured();
    let mut daemon = project.spawn_daemon();

    project.gr().args(&["status"]).passes().stdout_has("grd running").stdout_has("pr-hook");
    project.gr().args(&["jobs"]).passes().stdout_has("No jobs");
    let jobs = project.gr().args(&["jobs", "-o", "json"]).passes().stdout();
    similar_asserts::assert_eq!(jobs.as_str(), "[]\n");

    let status: serde_json::Value =
        serde_json::from_str(&project.gr().args(&["status", "-o", "json"]).passes().stdout())
            .unwrap();
    assert_eq!(status["units"][0], "base");
    assert_eq!(status["jobs_active"], 0);
    project
        .gr()
        .args(&["deliver", "/nowhere", "{}"])
        .fails_with(1)
        .stderr_has("no active unit owns route '/nowhere'");
    project.gr().args(&["emit", "webhook"]).passes().stdout_has("Queued event 'webhook'");

    project.gr().args(&["shutdown"]).passes();
    assert!(daemon.wait_exit().success());
    assert!(!project.state_dir().join("daemon.sock").exists());
    assert!(!project.state_dir().join("daemon.pid").exists());
}

#[test]
fn second_daemon_fails_to_lock() {
    let project = Project::configured();
    let _daemon = project.spawn_daemon();

    project.grd().fails_with(1).stderr_has("daemon already running");
    // The running daemon keeps its socket
    assert!(project.state_dir().join("daemon.sock").exists());
}
