// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine loop: drains queued work through the runtime, one pass at a time.

use std::sync::Arc;

use gr_core::Event;
use gr_engine::{Runtime, RuntimeError};
use gr_wire::JobEntry;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Capacity of the work queue between the listener and the engine.
pub const QUEUE_CAPACITY: usize = 256;

/// Work queued by the listener.
#[derive(Debug, Clone, PartialEq)]
pub enum Work {
    Event(Event),
    Deliver { route: String, payload: serde_json::Value },
}

/// Job cache contents as last seen by the engine, for queries.
pub type JobsView = Arc<Mutex<Vec<JobEntry>>>;

pub fn snapshot(runtime: &Runtime) -> Vec<JobEntry> {
    runtime.jobs().into_iter().map(|(key, record)| JobEntry { key, record }).collect()
}

/// Process work until the queue closes or `shutdown` fires.
pub async fn run(
    mut runtime: Runtime,
    mut queue: mpsc::Receiver<Work>,
    jobs: JobsView,
    shutdown: CancellationToken,
) -> Runtime {
    *jobs.lock() = snapshot(&runtime);
    loop {
        let work = tokio::select! {
            _ = shutdown.cancelled() => break,
            work = queue.recv() => match work {
                Some(work) => work,
                None => break,
            },
        };
        process(&mut runtime, work).await;
        *jobs.lock() = snapshot(&runtime);
    }
    debug!("engine loop stopped");
    runtime
}

/// Run one item; failures are logged and never stop the loop.
pub async fn process(runtime: &mut Runtime, work: Work) {
    let result = match work {
        Work::Event(event) => {
            let name = event.name.clone();
            runtime.handle_event(event).await.map(|last| {
                info!(event = %name, last = %last.name, "event dispatched");
            })
        }
        Work::Deliver { route, payload } => {
            runtime.deliver(&route, &payload).await.map(|last| match last {
                Some(last) => info!(route, last = %last.name, "delivery dispatched"),
                None => debug!(route, "delivery ignored"),
            })
        }
    };
    if let Err(e) = result {
        log_runtime_error(&e);
    }
}

fn log_runtime_error(e: &RuntimeError) {
    match e {
        RuntimeError::Dispatch(failure) => {
            error!(unit = failure.unit(), error = %failure, "dispatch failed")
        }
        RuntimeError::Intake { unit, source } => {
            warn!(unit = %unit, error = %source, "payload rejected")
        }
        RuntimeError::UnknownRoute(route) => warn!(route = %route, "no unit owns route"),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
