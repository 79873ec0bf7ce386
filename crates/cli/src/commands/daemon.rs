// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon queries: jobs, status, shutdown.

use anyhow::Result;
use serde_json::json;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::{format_jobs, format_status, print_json, OutputFormat};

pub async fn jobs(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let jobs = client.jobs().await.map_err(ExitError::from)?;
    match format {
        OutputFormat::Text => print!("{}", format_jobs(&jobs)),
        OutputFormat::Json => print_json(&jobs)?,
    }
    Ok(())
}

pub async fn status(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let status = client.status().await.map_err(ExitError::from)?;
    match format {
        OutputFormat::Text => {
            print!("{}", format_status(&status));
            println!("  socket: {}", client.socket_path().display());
        }
        OutputFormat::Json => print_json(&json!({
            "uptime_secs": status.uptime_secs,
            "units": status.units,
            "jobs_active": status.jobs_active,
        }))?,
    }
    Ok(())
}

pub async fn shutdown(client: &DaemonClient) -> Result<()> {
    client.shutdown().await.map_err(ExitError::from)?;
    println!("Daemon shutting down");
    Ok(())
}
