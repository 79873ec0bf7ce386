// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::context::{Context, RuntimeDeps};
use crate::registry::{apply_defaults, setup_units};
use crate::runtime::Runtime;
use crate::unit::{Unit, UnitDescriptor, UnitError};
use crate::units::{builtin_registry, DEFAULT_UNITS};
use async_trait::async_trait;
use gr_adapters::{FakeRemoteShell, FakeStatusNotifier, RemoteOutput};
use gr_core::{ConfigStore, Event, JobKey, JobRecord, Value};
use gr_storage::JobCache;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Submit output in the shape the grid prints it.
pub(crate) const SUBMIT_STDOUT: &str =
    "Submitted run with GID 778\nhttps://grid.example/report/778\n";

/// Runtime over the default units, with fakes for every adapter.
pub(crate) struct TestContext {
    pub runtime: Runtime,
    pub remote: FakeRemoteShell,
    pub notifier: FakeStatusNotifier,
    pub dir: TempDir,
}

/// Options a working relay must set, as a run-control file would.
pub(crate) fn required_options() -> ConfigStore {
    ConfigStore::from_pairs([
        ("repo_owner", Value::from("acme")),
        ("repo_name", Value::from("widget")),
        ("grid_host", Value::from("submit.grid.example")),
        ("grid_user", Value::from("builder")),
        ("grid_scripts_url", Value::from("https://example.com/acme/widget-grid.git")),
        ("grid_run_spec", Value::from("widget.run-spec")),
    ])
}

/// Config for the default units: defaults, then `overrides`, then setup.
pub(crate) fn configured(overrides: &ConfigStore) -> ConfigStore {
    let registry = builtin_registry().unwrap();
    let order = registry.resolve(DEFAULT_UNITS).unwrap();
    let mut config = ConfigStore::new();
    apply_defaults(&order, &mut config);
    config.merge(&required_options());
    config.merge(overrides);
    setup_units(&order, &mut config).unwrap();
    config
}

pub(crate) fn setup() -> TestContext {
    setup_with(&ConfigStore::new())
}

pub(crate) fn setup_with(overrides: &ConfigStore) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let registry = builtin_registry().unwrap();
    let order = registry.resolve(DEFAULT_UNITS).unwrap();
    let config = configured(overrides);
    let jobs = JobCache::open(dir.path().join("jobs.cache")).unwrap();

    let remote = FakeRemoteShell::new();
    remote.respond("nmi_submit", RemoteOutput::stdout(SUBMIT_STDOUT));
    let notifier = FakeStatusNotifier::new();
    let deps =
        RuntimeDeps { remote: Arc::new(remote.clone()), notifier: Arc::new(notifier.clone()) };

    let runtime = Runtime::new(order, Context::new(config, jobs, deps));
    TestContext { runtime, remote, notifier, dir }
}

impl TestContext {
    pub(crate) fn job(&self, key: &JobKey) -> Option<JobRecord> {
        self.runtime.context().jobs.get(key).cloned()
    }

    /// Reopen the cache file the runtime writes to.
    pub(crate) fn reopen_cache(&self) -> JobCache {
        JobCache::open(self.dir.path().join("jobs.cache")).unwrap()
    }
}

pub(crate) fn acme_key() -> JobKey {
    JobKey::new("acme", "widget", 42)
}

/// Unit that records what it sees and can chain or fail on demand.
pub(crate) struct ScriptedUnit {
    descriptor: UnitDescriptor,
    seen: Arc<Mutex<Vec<String>>>,
    chain_to: Option<Event>,
    fail: bool,
}

impl ScriptedUnit {
    pub(crate) fn new(descriptor: UnitDescriptor, seen: &Arc<Mutex<Vec<String>>>) -> Self {
        Self { descriptor, seen: Arc::clone(seen), chain_to: None, fail: false }
    }

    /// Replace the current event with `event` after recording.
    pub(crate) fn chaining(mut self, event: Event) -> Self {
        self.chain_to = Some(event);
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl Unit for ScriptedUnit {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    async fn execute(&self, ctx: &mut Context) -> Result<(), UnitError> {
        let event = ctx.current_event()?.name.to_string();
        self.seen.lock().unwrap().push(format!("{}:{}", self.descriptor.name, event));
        if self.fail {
            return Err(UnitError::Invalid(format!("{} refused", self.descriptor.name)));
        }
        if let Some(next) = &self.chain_to {
            ctx.replace_event(next.clone());
        }
        Ok(())
    }
}

/// Unit with only a descriptor, for resolution tests.
pub(crate) fn stub(name: &str, requires: &[&str]) -> Arc<dyn Unit> {
    struct Stub(UnitDescriptor);
    impl Unit for Stub {
        fn descriptor(&self) -> &UnitDescriptor {
            &self.0
        }
    }
    Arc::new(Stub(UnitDescriptor::new(name).requires(requires.iter().copied())))
}

/// Empty context over a throwaway cache.
pub(crate) fn bare_context(dir: &TempDir) -> Context {
    let jobs = JobCache::open(dir.path().join("jobs.cache")).unwrap();
    let deps = RuntimeDeps {
        remote: Arc::new(FakeRemoteShell::new()),
        notifier: Arc::new(FakeStatusNotifier::new()),
    };
    Context::new(ConfigStore::new(), jobs, deps)
}
