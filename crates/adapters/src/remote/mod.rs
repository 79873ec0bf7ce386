// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote shell boundary to the grid's submit host.
//!
//! The engine never transfers files; every remote mutation is a shell
//! command built with `gr_shell` and sent through [`RemoteShell::run`].

mod openssh;

pub use openssh::OpenSshAdapter;

use async_trait::async_trait;
use gr_shell::RemoteCommand;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from remote shell operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("cannot connect to {host}: {reason}")]
    Connect { host: String, reason: String },
    #[error("remote command failed: {reason}")]
    Exec { reason: String },
    #[error("remote command timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("remote session is closed")]
    SessionClosed,
}

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub key: Option<PathBuf>,
    /// Upper bound for connecting and for each command.
    pub command_timeout: Duration,
}

impl RemoteTarget {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            key: None,
            command_timeout: crate::subprocess::REMOTE_COMMAND_TIMEOUT,
        }
    }

    gr_core::chain_setters! {
        set {
            port: u16,
            command_timeout: Duration,
        }
        option {
            key: PathBuf,
        }
    }

    /// `user@host` for logs.
    pub fn destination(&self) -> String {
        if self.user.is_empty() {
            self.host.clone()
        } else {
            format!("{}@{}", self.user, self.host)
        }
    }
}

/// An open connection handle returned by [`RemoteShell::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSession {
    pub id: String,
    pub target: RemoteTarget,
    /// Adapter-specific handle (the ControlMaster socket for OpenSSH).
    pub control_path: Option<PathBuf>,
}

/// Captured result of one remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl RemoteOutput {
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self { stdout: stdout.into(), stderr: String::new(), exit_code: Some(0) }
    }

    pub fn stderr(stderr: impl Into<String>) -> Self {
        Self { stdout: String::new(), stderr: stderr.into(), exit_code: Some(0) }
    }

    /// Non-empty stdout lines.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect()
    }

    pub fn has_stderr(&self) -> bool {
        !self.stderr.trim().is_empty()
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Adapter for running commands on the grid's submit host
#[async_trait]
pub trait RemoteShell: Send + Sync + 'static {
    /// Open a session to `target`.
    async fn connect(&self, target: &RemoteTarget) -> Result<RemoteSession, RemoteError>;

    /// Run one command line and capture its output.
    ///
    /// A non-zero exit status is reported in [`RemoteOutput::exit_code`], not as an error.
    async fn run(
        &self,
        session: &RemoteSession,
        command: &RemoteCommand,
    ) -> Result<RemoteOutput, RemoteError>;

    /// Close the session. Never fails; problems are logged.
    async fn close(&self, session: RemoteSession);
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRemoteShell, RemoteCall};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
