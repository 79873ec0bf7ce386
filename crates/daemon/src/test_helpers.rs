// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the daemon crate.

use std::path::Path;
use std::sync::Arc;

use gr_adapters::{FakeRemoteShell, FakeStatusNotifier, RemoteOutput};
use gr_core::test_support::pull_request_webhook;
use gr_core::{ConfigStore, RequestDescriptor, Value};
use gr_engine::RuntimeDeps;

use crate::lifecycle::Config;
use crate::plan::{Plan, Settings};

pub(crate) const SUBMIT_STDOUT: &str =
    "Submitted run with GID 778\nhttps://grid.example/report/778\n";

/// Options a working relay must set, as a run-control file would.
pub(crate) fn rc_options() -> ConfigStore {
    ConfigStore::from_pairs([
        ("repo_owner", Value::from("acme")),
        ("repo_name", Value::from("widget")),
        ("grid_host", Value::from("submit.grid.example")),
        ("grid_user", Value::from("builder")),
        ("grid_scripts_url", Value::from("https://example.com/acme/widget-grid.git")),
        ("grid_run_spec", Value::from("widget.run-spec")),
    ])
}

/// Default units, set up over [`rc_options`].
pub(crate) fn planned() -> (Plan, Settings) {
    let mut plan = Plan::build(&rc_options(), &ConfigStore::new()).unwrap();
    let settings = plan.setup().unwrap();
    (plan, settings)
}

pub(crate) struct Fakes {
    pub remote: FakeRemoteShell,
    pub notifier: FakeStatusNotifier,
}

impl Fakes {
    pub(crate) fn new() -> Self {
        let remote = FakeRemoteShell::new();
        remote.respond("nmi_submit", RemoteOutput::stdout(SUBMIT_STDOUT));
        Self { remote, notifier: FakeStatusNotifier::new() }
    }

    pub(crate) fn deps(&self) -> RuntimeDeps {
        RuntimeDeps {
            remote: Arc::new(self.remote.clone()),
            notifier: Arc::new(self.notifier.clone()),
        }
    }
}

pub(crate) fn test_config(dir: &Path) -> Config {
    Config::at(dir.join("state"))
}

/// Pull-request webhook body for acme/widget#42.
pub(crate) fn opened() -> serde_json::Value {
    pull_request_webhook("opened", &RequestDescriptor::builder().build())
}
