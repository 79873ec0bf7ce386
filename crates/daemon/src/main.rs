// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `grd`: the gridrelay daemon.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use gr_adapters::{LogNotifier, OpenSshAdapter};
use gr_daemon::engine::{self, JobsView, QUEUE_CAPACITY};
use gr_daemon::lifecycle::{self, open_runtime};
use gr_daemon::listener::{ListenCtx, Listener};
use gr_daemon::{logging, Args, Command, Config, Plan, StartupResult};
use gr_engine::RuntimeDeps;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("grd: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn deps(config: &Config) -> RuntimeDeps {
    RuntimeDeps {
        remote: Arc::new(OpenSshAdapter::new(config.ssh_dir.clone())),
        notifier: Arc::new(LogNotifier::new()),
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut plan = Plan::configure(&args)?;

    if let Some(Command::Report) = args.command {
        let settings = plan.setup()?;
        let runtime = open_runtime(&config, plan, &settings, deps(&config))?;
        print!("{}", runtime.report());
        return Ok(());
    }

    let _log_guard = logging::init(&plan.config, &config.log_dir)?;
    info!(version = gr_daemon::env::VERSION, units = ?plan.unit_names(), "starting grd");
    let settings = plan.setup()?;
    let debug = plan.config.bool("debug")?;

    let StartupResult { mut daemon, listener, runtime } =
        lifecycle::startup(&config, plan, &settings, deps(&config))
            .await
            .context("daemon startup failed")?;
    if debug {
        info!("debug report\n{}", runtime.report());
    }

    let shutdown = CancellationToken::new();
    let jobs: JobsView = Arc::default();
    let (queue, work) = mpsc::channel(QUEUE_CAPACITY);
    let ctx = Arc::new(ListenCtx {
        queue,
        units: runtime.units(),
        routes: runtime.routes(),
        jobs: Arc::clone(&jobs),
        start_time: daemon.start_time,
        shutdown: shutdown.clone(),
    });

    let engine = tokio::spawn(engine::run(runtime, work, jobs, shutdown.clone()));
    let listener = tokio::spawn(Listener::new(listener, ctx).run());

    tokio::select! {
        _ = shutdown.cancelled() => info!("shutdown requested"),
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            info!("interrupted");
            shutdown.cancel();
        }
    }

    // Let an in-flight dispatch pass finish before removing the socket
    if let Err(e) = engine.await {
        error!("engine task failed: {}", e);
    }
    listener.abort();
    daemon.shutdown()?;
    Ok(())
}
