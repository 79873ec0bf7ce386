// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket client for the `grd` daemon.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gr_core::Event;
use gr_wire::{self as wire, JobEntry, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

use crate::exit_error::{ExitError, EXIT_REJECTED, EXIT_UNREACHABLE};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running (no socket at {})", .0.display())]
    DaemonNotRunning(PathBuf),

    #[error("failed to connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("daemon error: {0}")]
    Rejected(String),

    #[error("unexpected response: {0:?}")]
    Unexpected(Box<Response>),
}

impl From<ClientError> for ExitError {
    fn from(e: ClientError) -> Self {
        let code = match e {
            ClientError::DaemonNotRunning(_) | ClientError::Connect { .. } => EXIT_UNREACHABLE,
            _ => EXIT_REJECTED,
        };
        ExitError::new(code, e.to_string())
    }
}

/// Status summary reported by the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub units: Vec<String>,
    pub jobs_active: usize,
}

pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { socket_path: socket_path.into(), timeout }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send one request and read its response.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|source| {
            match source.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused => {
                    ClientError::DaemonNotRunning(self.socket_path.clone())
                }
                _ => ClientError::Connect { path: self.socket_path.clone(), source },
            }
        })?;
        let (mut reader, mut writer) = stream.into_split();
        wire::write_request(&mut writer, request, self.timeout).await?;
        Ok(wire::read_response(&mut reader, self.timeout).await?)
    }

    fn reject<T>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            other => Err(ClientError::Unexpected(Box::new(other))),
        }
    }

    /// Queue an event; `false` when the daemon could not take it.
    pub async fn emit(&self, event: Event) -> Result<bool, ClientError> {
        match self.send(&Request::Event { event }).await? {
            Response::Event { accepted } => Ok(accepted),
            other => Self::reject(other),
        }
    }

    /// Hand a payload to the unit owning `route`.
    pub async fn deliver(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<bool, ClientError> {
        let request = Request::Deliver { route: route.to_string(), payload };
        match self.send(&request).await? {
            Response::Event { accepted } => Ok(accepted),
            other => Self::reject(other),
        }
    }

    pub async fn jobs(&self) -> Result<Vec<JobEntry>, ClientError> {
        match self.send(&Request::Jobs).await? {
            Response::Jobs { jobs } => Ok(jobs),
            other => Self::reject(other),
        }
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status { uptime_secs, units, jobs_active } => {
                Ok(DaemonStatus { uptime_secs, units, jobs_active })
            }
            other => Self::reject(other),
        }
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::ShuttingDown | Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
