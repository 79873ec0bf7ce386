// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `gr`: command-line client for the gridrelay daemon.

mod client;
mod color;
mod commands;
mod exit_error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::client::DaemonClient;
use crate::exit_error::{ExitError, EXIT_REJECTED};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "gr", version, about = "Talk to the gridrelay daemon", styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue an event for dispatch
    Emit {
        /// Event name, e.g. new-request
        name: String,
        /// Event data as JSON
        #[arg(value_name = "JSON")]
        json: Option<String>,
    },
    /// Hand a payload to the unit that owns a route
    Deliver {
        /// Route, e.g. /hook
        route: String,
        /// Payload as JSON; read from stdin when omitted
        #[arg(value_name = "JSON")]
        json: Option<String>,
    },
    /// List outstanding grid jobs
    Jobs,
    /// Show daemon status
    Status,
    /// Stop the daemon
    Shutdown,
}

fn client() -> anyhow::Result<DaemonClient> {
    let config = gr_daemon::Config::load()?;
    Ok(DaemonClient::new(config.socket_path, gr_daemon::env::ipc_timeout()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = client()?;
    match cli.command {
        Commands::Emit { name, json } => commands::emit::emit(&client, &name, json).await,
        Commands::Deliver { route, json } => commands::emit::deliver(&client, &route, json).await,
        Commands::Jobs => commands::daemon::jobs(&client, cli.output).await,
        Commands::Status => commands::daemon::status(&client, cli.output).await,
        Commands::Shutdown => commands::daemon::shutdown(&client).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<ExitError>().map_or(EXIT_REJECTED, |exit| exit.code);
            eprintln!("gr: {e:#}");
            ExitCode::from(code)
        }
    }
}
