// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener runs in a spawned task, accepting connections and
//! answering them without blocking the engine loop. Events and deliveries
//! are queued for the engine and acknowledged at once.

use std::sync::Arc;
use std::time::Instant;

use gr_wire::{self as wire, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::{JobsView, Work};
use crate::env::ipc_timeout;

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub queue: mpsc::Sender<Work>,
    /// Active unit names in resolution order
    pub units: Vec<String>,
    /// Routes owned by active units
    pub routes: Vec<String>,
    pub jobs: JobsView,
    pub start_time: Instant,
    pub shutdown: CancellationToken,
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, ctx }
    }

    /// Accept connections until shutdown, spawning a task for each.
    pub async fn run(self) {
        loop {
            let accepted = tokio::select! {
                _ = self.ctx.shutdown.cancelled() => break,
                accepted = self.unix.accept() => accepted,
            };
            match accepted {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(reader, writer, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("unix accept error: {}", e),
            }
        }
        debug!("listener stopped");
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => warn!("connection timeout"),
        _ => error!("connection error: {}", e),
    }
}

/// Read one request, answer it, and return.
pub async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let request = wire::read_request(&mut reader, ipc_timeout()).await?;

    // Status polling is frequent; everything else is worth an info line
    if matches!(request, Request::Ping | Request::Status | Request::Jobs) {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    let response = handle_request(request, ctx).await;
    debug!("sending response: {:?}", response);
    wire::write_response(&mut writer, &response, ipc_timeout()).await?;
    Ok(())
}

pub async fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Event { event } => enqueue(ctx, Work::Event(event)).await,

        Request::Deliver { route, payload } => {
            if !ctx.routes.contains(&route) {
                return Response::Error { message: format!("no active unit owns route '{route}'") };
            }
            enqueue(ctx, Work::Deliver { route, payload }).await
        }

        Request::Jobs => Response::Jobs { jobs: ctx.jobs.lock().clone() },

        Request::Status => Response::Status {
            uptime_secs: ctx.start_time.elapsed().as_secs(),
            units: ctx.units.clone(),
            jobs_active: ctx.jobs.lock().len(),
        },

        Request::Shutdown => {
            ctx.shutdown.cancel();
            Response::ShuttingDown
        }
    }
}

async fn enqueue(ctx: &ListenCtx, work: Work) -> Response {
    match ctx.queue.send(work).await {
        Ok(()) => Response::Event { accepted: true },
        Err(_) => {
            warn!("engine queue closed, dropping work");
            Response::Event { accepted: false }
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
