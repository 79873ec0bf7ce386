// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: an isolated state directory and fluent command assertions.

use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::assert::Assert;
use tempfile::TempDir;

/// Run-control file with every required option.
pub const RC: &str = r#"
repo_owner = "acme"
repo_name = "widget"
grid_host = "submit.grid.example"
grid_user = "builder"
grid_scripts_url = "https://example.com/acme/widget-grid.git"
grid_run_spec = "widget.run-spec"
"#;

/// A working directory plus a private state directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    /// Project with a complete `gridrelay.toml`.
    pub fn configured() -> Self {
        let project = Self::empty();
        project.file("gridrelay.toml", RC);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    pub fn file(&self, name: &str, contents: &str) {
        std::fs::write(self.path().join(name), contents).unwrap();
    }

    fn command(&self, bin: &str) -> Cmd {
        let mut cmd = assert_cmd::Command::cargo_bin(bin).unwrap();
        cmd.current_dir(self.path())
            .env("GR_STATE_DIR", self.state_dir())
            .env("GR_IPC_TIMEOUT_MS", "2000")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        Cmd(cmd)
    }

    pub fn grd(&self) -> Cmd {
        self.command("grd")
    }

    pub fn gr(&self) -> Cmd {
        self.command("gr")
    }

    /// Start `grd` in the background and wait for its socket.
    pub fn spawn_daemon(&self) -> Daemon {
        let child = std::process::Command::new(assert_cmd::cargo::cargo_bin("grd"))
            .current_dir(self.path())
            .env("GR_STATE_DIR", self.state_dir())
            .env("NO_COLOR", "1")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let daemon = Daemon { child };
        let socket = self.state_dir().join("daemon.sock");
        wait_for(|| socket.exists(), "daemon socket");
        daemon
    }
}

pub struct Cmd(assert_cmd::Command);

impl Cmd {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.0.args(args);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.0.write_stdin(input.to_string());
        self
    }

    pub fn passes(mut self) -> Output {
        Output(self.0.assert().success())
    }

    pub fn fails_with(mut self, code: i32) -> Output {
        Output(self.0.assert().code(code))
    }
}

pub struct Output(Assert);

impl Output {
    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    pub fn stdout(&self) -> String {
        Self::text(&self.0.get_output().stdout)
    }

    pub fn stderr(&self) -> String {
        Self::text(&self.0.get_output().stderr)
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {needle:?}:\n{stderr}");
        self
    }
}

/// A background daemon, killed on drop if still running.
pub struct Daemon {
    child: Child,
}

impl Daemon {
    /// Wait for the process to exit on its own.
    pub fn wait_exit(&mut self) -> std::process::ExitStatus {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(status) = self.child.try_wait().unwrap() {
                return status;
            }
            assert!(Instant::now() < deadline, "daemon did not exit");
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

pub fn wait_for(mut ready: impl FnMut() -> bool, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !ready() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(50));
    }
}
