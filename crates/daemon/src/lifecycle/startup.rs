// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::time::Instant;

use fs2::FileExt;
use gr_engine::{Context, Runtime, RuntimeDeps};
use gr_storage::JobCache;
use tokio::net::UnixListener;
use tracing::info;

use super::{Config, DaemonState, LifecycleError, StartupResult};
use crate::plan::{Plan, Settings};

/// Start the daemon from a plan whose units have already been set up.
pub async fn startup(
    config: &Config,
    plan: Plan,
    settings: &Settings,
    deps: RuntimeDeps,
) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config, plan, settings, deps).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock:
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

async fn startup_inner(
    config: &Config,
    plan: Plan,
    settings: &Settings,
    deps: RuntimeDeps,
) -> Result<StartupResult, LifecycleError> {
    // 1. Create state directory (needed for socket, lock, etc.)
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST; opening must not truncate the running
    // daemon's PID before we hold the lock.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Open the job cache and build the runtime
    let runtime = open_runtime(config, plan, settings, deps)?;
    info!(jobs = runtime.jobs().len(), units = ?runtime.units(), "runtime ready");
    if let Some(source) = &settings.source {
        info!(
            repository = %format!("{}/{}", source.owner, source.repository),
            hook = %settings.server.endpoint(gr_engine::units::HOOK_ROUTE),
            "relaying pull requests"
        );
    }

    // 4. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!(socket = %config.socket_path.display(), "daemon started");

    let daemon = DaemonState { config: config.clone(), lock_file, start_time: Instant::now() };
    Ok(StartupResult { daemon, listener, runtime })
}

/// Open the job cache and assemble a runtime over the plan's units.
///
/// Relative cache paths resolve against the state directory.
pub fn open_runtime(
    config: &Config,
    plan: Plan,
    settings: &Settings,
    deps: RuntimeDeps,
) -> Result<Runtime, LifecycleError> {
    let cache_path = match &settings.grid {
        Some(grid) => grid.jobs_cache_in(&config.state_dir),
        None => config.state_dir.join("jobs.cache"),
    };
    let jobs = JobCache::open(cache_path)?;
    Ok(Runtime::new(plan.order, Context::new(plan.config, jobs, deps)))
}

fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
