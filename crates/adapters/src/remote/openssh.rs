// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote shell over the system OpenSSH client.
//!
//! `connect` starts a background ControlMaster (`ssh -M -N -f`); every
//! `run` multiplexes over its socket, and `close` asks the master to exit.

use super::{RemoteError, RemoteOutput, RemoteSession, RemoteShell, RemoteTarget};
use crate::subprocess::{run_with_timeout, SubprocessError, CONTROL_TIMEOUT};
use async_trait::async_trait;
use gr_shell::RemoteCommand;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// OpenSSH-backed [`RemoteShell`].
#[derive(Debug, Clone)]
pub struct OpenSshAdapter {
    control_dir: PathBuf,
    program: String,
}

impl OpenSshAdapter {
    /// ControlMaster sockets are created under `control_dir`.
    pub fn new(control_dir: impl Into<PathBuf>) -> Self {
        Self { control_dir: control_dir.into(), program: "ssh".to_string() }
    }

    /// Use a different `ssh` binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, args: Vec<String>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }
}

/// Options shared by the master and every multiplexed command.
pub(crate) fn common_args(target: &RemoteTarget, control_path: &Path) -> Vec<String> {
    let mut args = vec![
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        format!("ControlPath={}", control_path.display()),
        "-p".to_string(),
        target.port.to_string(),
    ];
    if !target.user.is_empty() {
        args.push("-l".to_string());
        args.push(target.user.clone());
    }
    args
}

pub(crate) fn master_args(target: &RemoteTarget, control_path: &Path) -> Vec<String> {
    let mut args = vec!["-M".to_string(), "-N".to_string(), "-f".to_string()];
    args.extend(common_args(target, control_path));
    args.push("-o".to_string());
    args.push(format!("ConnectTimeout={}", target.command_timeout.as_secs().max(1)));
    if let Some(key) = &target.key {
        args.push("-i".to_string());
        args.push(key.display().to_string());
    }
    args.push(target.host.clone());
    args
}

pub(crate) fn run_args(target: &RemoteTarget, control_path: &Path, line: &str) -> Vec<String> {
    let mut args = common_args(target, control_path);
    args.push(target.host.clone());
    args.push("--".to_string());
    args.push(line.to_string());
    args
}

pub(crate) fn exit_args(target: &RemoteTarget, control_path: &Path) -> Vec<String> {
    let mut args = vec!["-O".to_string(), "exit".to_string()];
    args.extend(common_args(target, control_path));
    args.push(target.host.clone());
    args
}

#[async_trait]
impl RemoteShell for OpenSshAdapter {
    async fn connect(&self, target: &RemoteTarget) -> Result<RemoteSession, RemoteError> {
        let connect_err =
            |reason: String| RemoteError::Connect { host: target.destination(), reason };

        std::fs::create_dir_all(&self.control_dir).map_err(|e| connect_err(e.to_string()))?;
        let id = nanoid::nanoid!(10);
        let control_path = self.control_dir.join(format!("ssh-{id}.sock"));

        tracing::debug!(destination = %target.destination(), %id, "opening ssh master");
        let cmd = self.command(master_args(target, &control_path));
        let output = run_with_timeout(cmd, target.command_timeout, "ssh connect")
            .await
            .map_err(|e| connect_err(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(connect_err(if stderr.is_empty() {
                format!("ssh exited with {}", output.status)
            } else {
                stderr
            }));
        }

        Ok(RemoteSession { id, target: target.clone(), control_path: Some(control_path) })
    }

    async fn run(
        &self,
        session: &RemoteSession,
        command: &RemoteCommand,
    ) -> Result<RemoteOutput, RemoteError> {
        let control_path = match &session.control_path {
            Some(path) if path.exists() => path,
            _ => return Err(RemoteError::SessionClosed),
        };
        let line = command.render();
        tracing::debug!(session = %session.id, command = %line, "remote run");

        let cmd = self.command(run_args(&session.target, control_path, &line));
        let output = run_with_timeout(cmd, session.target.command_timeout, "ssh run")
            .await
            .map_err(|e| match e {
                SubprocessError::Timeout { after, .. } => {
                    RemoteError::Timeout { secs: after.as_secs() }
                }
                other => RemoteError::Exec { reason: other.to_string() },
            })?;

        Ok(RemoteOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }

    async fn close(&self, session: RemoteSession) {
        let Some(control_path) = session.control_path else {
            return;
        };
        let cmd = self.command(exit_args(&session.target, &control_path));
        if let Err(e) = run_with_timeout(cmd, CONTROL_TIMEOUT, "ssh exit").await {
            tracing::warn!(session = %session.id, error = %e, "failed to stop ssh master");
        }
        if control_path.exists() {
            let _ = std::fs::remove_file(&control_path);
        }
        tracing::debug!(session = %session.id, "ssh session closed");
    }
}

#[cfg(test)]
#[path = "openssh_tests.rs"]
mod tests;
