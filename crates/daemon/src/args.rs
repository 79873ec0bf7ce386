// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line flags for `grd`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gr_core::{ConfigStore, Value};

#[derive(Debug, Parser)]
#[command(name = "grd", version, about = "Relay pull-request events to a remote build grid")]
pub struct Args {
    /// Units to activate (repeatable or comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub units: Vec<String>,

    /// Run-control file (default: gridrelay.toml)
    #[arg(long)]
    pub rc: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log the configuration report at startup
    #[arg(long)]
    pub debug: bool,

    /// Override an option, e.g. `--set grid_port=2222`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, Value)>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print version, unit order, configuration and cached jobs, then exit
    Report,
}

impl Args {
    /// Options given on the command line, flags included.
    pub fn config(&self) -> ConfigStore {
        let mut store = ConfigStore::new();
        if let Some(rc) = &self.rc {
            store.set("rc", rc.display().to_string());
        }
        if !self.units.is_empty() {
            store.set("units", self.units.clone());
        }
        if self.verbose {
            store.set("verbose", true);
        }
        if self.debug {
            store.set("debug", true);
        }
        for (key, value) in &self.overrides {
            store.set(key.clone(), value.clone());
        }
        store
    }
}

fn parse_override(raw: &str) -> Result<(String, Value), String> {
    let (key, value) =
        raw.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option name in '{raw}'"));
    }
    Ok((key.to_string(), Value::parse_override(value)))
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
