// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed views over the configuration store, one per concern.

use gr_adapters::RemoteTarget;
use gr_core::{ConfigError, ConfigStore};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { name: name.to_string(), reason: reason.into() }
}

fn port(store: &ConfigStore, name: &str, default: u16) -> Result<u16, ConfigError> {
    match store.int(name)? {
        None => Ok(default),
        Some(p) => u16::try_from(p)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| invalid(name, format!("{p} is not a TCP port"))),
    }
}

/// Where this relay listens for callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub server_url: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        Ok(Self {
            server_url: store.require_str("server_url")?.trim_end_matches('/').to_string(),
            port: port(store, "port", 8080)?,
        })
    }

    /// Public URL of `route`; the port is omitted when it is 80.
    pub fn endpoint(&self, route: &str) -> String {
        if self.port == 80 {
            format!("{}{}", self.server_url, route)
        } else {
            format!("{}:{}{}", self.server_url, self.port, route)
        }
    }
}

/// The repository whose pull requests are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub owner: String,
    pub repository: String,
    pub events: Vec<String>,
}

impl SourceConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        Ok(Self {
            owner: store.require_str("repo_owner")?.to_string(),
            repository: store.require_str("repo_name")?.to_string(),
            events: store.list("source_events")?,
        })
    }
}

/// Connection to the grid's submit host and the local job cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub ssh_key: Option<PathBuf>,
    pub jobs_cache: PathBuf,
    pub command_timeout: Duration,
}

impl GridConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        let timeout = store.int("grid_command_timeout_secs")?.unwrap_or(300);
        let timeout = u64::try_from(timeout)
            .ok()
            .filter(|t| *t > 0)
            .ok_or_else(|| invalid("grid_command_timeout_secs", "must be a positive number"))?;
        Ok(Self {
            host: store.require_str("grid_host")?.to_string(),
            port: port(store, "grid_port", 22)?,
            user: store.require_str("grid_user")?.to_string(),
            ssh_key: store.str("grid_ssh_key")?.filter(|k| !k.is_empty()).map(PathBuf::from),
            jobs_cache: PathBuf::from(store.require_str("grid_jobs_cache")?),
            command_timeout: Duration::from_secs(timeout),
        })
    }

    pub fn target(&self) -> RemoteTarget {
        let target = RemoteTarget::new(&self.host, &self.user)
            .port(self.port)
            .command_timeout(self.command_timeout);
        match &self.ssh_key {
            Some(key) => target.key(key.clone()),
            None => target,
        }
    }

    /// Cache path, resolving a relative path against `state_dir`.
    pub fn jobs_cache_in(&self, state_dir: &Path) -> PathBuf {
        if self.jobs_cache.is_absolute() {
            self.jobs_cache.clone()
        } else {
            state_dir.join(&self.jobs_cache)
        }
    }
}

/// How the build scripts reach the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptsSource {
    Git(String),
    Zip(String),
}

impl ScriptsSource {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        if url.ends_with(".git") {
            Ok(ScriptsSource::Git(url.to_string()))
        } else if url.ends_with(".zip") {
            Ok(ScriptsSource::Zip(url.to_string()))
        } else {
            Err(invalid("grid_scripts_url", format!("must end in '.git' or '.zip', found {url:?}")))
        }
    }
}

/// Paths reach the remote shell quoted, so `~` would never expand.
fn workdir_root(store: &ConfigStore) -> Result<String, ConfigError> {
    let root = store.str("grid_workdir_root")?.unwrap_or_default();
    if root.starts_with('~') {
        return Err(invalid(
            "grid_workdir_root",
            format!("must be absolute or relative to the login directory, found {root:?}"),
        ));
    }
    Ok(root.to_string())
}

/// Everything the submission protocol needs besides the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfig {
    pub submit_cmd: String,
    pub kill_cmd: String,
    pub scripts: ScriptsSource,
    pub fetch_file: String,
    pub run_spec: String,
    pub workdir_root: String,
}

impl SubmitConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        Ok(Self {
            submit_cmd: store.require_str("grid_submit_cmd")?.to_string(),
            kill_cmd: store.require_str("grid_kill_cmd")?.to_string(),
            scripts: ScriptsSource::parse(store.require_str("grid_scripts_url")?)?,
            fetch_file: store.require_str("grid_fetch_file")?.to_string(),
            run_spec: store.require_str("grid_run_spec")?.to_string(),
            workdir_root: workdir_root(store)?,
        })
    }

    /// Remote working directory for a job directory name.
    ///
    /// Relative paths are relative to the remote login directory.
    pub fn working_dir(&self, dir_name: &str) -> String {
        let root = self.workdir_root.trim_end_matches('/');
        if root.is_empty() {
            dir_name.to_string()
        } else {
            format!("{root}/{dir_name}")
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
