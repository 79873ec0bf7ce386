// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gr` without a running daemon.

use crate::prelude::*;

#[test]
fn jobs_without_daemon_exits_unreachable() {
    Project::empty().gr().args(&["jobs"]).fails_with(3).stderr_has("daemon not running");
}

#[test]
fn emit_without_daemon_exits_unreachable() {
    Project::empty()
        .gr()
        .args(&["emit", "new-request", r#"{"number": 42}"#])
        .fails_with(3)
        .stderr_has("daemon not running");
}

#[test]
fn deliver_rejects_bad_json_from_stdin() {
    Project::empty()
        .gr()
        .args(&["deliver", "/hook"])
        .stdin("{not json")
        .fails_with(1)
        .stderr_has("invalid JSON payload");
}
