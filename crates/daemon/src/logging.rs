// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: stderr plus a daily-rotated file in the state directory.

use std::path::Path;

use gr_core::ConfigStore;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{Directive, EnvFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::lifecycle::LifecycleError;

/// File name prefix of the rotated daemon log.
pub const LOG_FILE: &str = "daemon.log";

/// Filter directives, lowest precedence first.
///
/// `RUST_LOG` replaces the level chosen by `verbose`; `log_directives` from
/// the configuration are always appended.
pub fn directives(
    config: &ConfigStore,
    rust_log: Option<&str>,
) -> Result<Vec<String>, LifecycleError> {
    let mut out = match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(env) => env.split(',').map(|d| d.trim().to_string()).collect(),
        None if config.bool("verbose")? => vec!["debug".to_string()],
        None => vec!["info".to_string()],
    };
    out.extend(config.list("log_directives")?);
    Ok(out)
}

pub fn filter(directives: &[String]) -> Result<EnvFilter, LifecycleError> {
    let mut filter = EnvFilter::default();
    for raw in directives.iter().filter(|d| !d.is_empty()) {
        let directive = raw
            .parse::<Directive>()
            .map_err(|e| LifecycleError::Logging(format!("bad directive '{raw}': {e}")))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// Install the global subscriber. Keep the guard alive to flush the file log.
pub fn init(config: &ConfigStore, log_dir: &Path) -> Result<WorkerGuard, LifecycleError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directives = directives(config, rust_log.as_deref())?;

    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter(&directives)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;
    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
