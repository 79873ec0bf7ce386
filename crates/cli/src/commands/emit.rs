// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feed events and route payloads to the daemon.

use anyhow::Result;
use gr_core::Event;

use crate::client::DaemonClient;
use crate::exit_error::{ExitError, EXIT_REJECTED};

/// Build the event `gr emit` sends; no JSON means `null` data.
pub fn event(name: &str, json: Option<String>) -> Result<Event> {
    let data = match json {
        Some(text) => super::read_payload(Some(text), std::io::empty())?,
        None => serde_json::Value::Null,
    };
    Ok(Event::new(name, data))
}

pub async fn emit(client: &DaemonClient, name: &str, json: Option<String>) -> Result<()> {
    let accepted = client.emit(event(name, json)?).await.map_err(ExitError::from)?;
    if !accepted {
        return Err(ExitError::new(EXIT_REJECTED, format!("daemon dropped event '{name}'")).into());
    }
    println!("Queued event '{name}'");
    Ok(())
}

pub async fn deliver(client: &DaemonClient, route: &str, json: Option<String>) -> Result<()> {
    let payload = super::read_payload(json, std::io::stdin().lock())?;
    let accepted = client.deliver(route, payload).await.map_err(ExitError::from)?;
    if !accepted {
        return Err(
            ExitError::new(EXIT_REJECTED, format!("daemon dropped payload for '{route}'")).into()
        );
    }
    println!("Queued payload for {route}");
    Ok(())
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
