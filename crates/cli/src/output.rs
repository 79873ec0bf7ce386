// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write as _;

use clap::ValueEnum;
use gr_wire::JobEntry;
use serde::Serialize;

use crate::client::DaemonStatus;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format a duration as its largest unit (e.g., "5s", "2m", "1h", "3d")
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

pub fn format_jobs(jobs: &[JobEntry]) -> String {
    if jobs.is_empty() {
        return "No jobs\n".to_string();
    }
    let width = jobs.iter().map(|j| j.key.to_string().len()).max().unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        crate::color::header(&format!("{:<width$}  {:<8}  REPORT", "JOB", "GRID ID"))
    );
    for job in jobs {
        let report = if job.record.report_url.is_empty() { "-" } else { &job.record.report_url };
        let _ = writeln!(
            out,
            "{:<width$}  {:<8}  {}",
            job.key.to_string(),
            job.record.grid_id,
            report
        );
    }
    out
}

pub fn format_status(status: &DaemonStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} running", crate::color::header("grd"));
    let _ = writeln!(out, "  uptime: {}", format_elapsed(status.uptime_secs));
    let _ = writeln!(out, "  units:  {}", status.units.join(", "));
    let _ = writeln!(out, "  jobs:   {}", status.jobs_active);
    out
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
