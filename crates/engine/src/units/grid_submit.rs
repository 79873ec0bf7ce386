// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote job lifecycle: supersede, provision, submit, record.
//!
//! Every remote step that fails ends the submission with an `error`
//! status event; only job cache failures propagate to the dispatcher.
//! The remote session is closed on every path.

use super::{GRID_BASE, GRID_SUBMIT, STATUS_ROUTE};
use crate::context::Context;
use crate::control_files::{
    self, InputsEdit, RunSpec, HOOK_STUB, MANIFEST_FILE, SCRIPTS_ARCHIVE,
};
use crate::settings::{GridConfig, ScriptsSource, ServerConfig, SubmitConfig};
use crate::unit::{Unit, UnitDescriptor, UnitError};
use async_trait::async_trait;
use gr_adapters::{RemoteOutput, RemoteSession, RemoteShell};
use gr_core::event::{NEW_REQUEST, STATUS_RELAY, STATUS_UPDATE, SYNC_REQUEST};
use gr_core::{
    ConfigStore, Event, JobKey, JobRecord, RequestDescriptor, Status, StatusPayload, Value,
};
use gr_shell::{
    append_file, cat, cd, chmod, mkdir, quote, remove_dir, sed_replace_line, write_file,
    RemoteCommand,
};
use gr_storage::{CacheError, JobCache};
use std::sync::Arc;

pub struct GridSubmit {
    descriptor: UnitDescriptor,
}

impl GridSubmit {
    pub fn new() -> Self {
        let defaults = ConfigStore::from_pairs([
            ("grid_submit_cmd", Value::from("nmi_submit")),
            ("grid_kill_cmd", Value::from("nmi_rm")),
            ("grid_scripts_url", Value::Unset),
            ("grid_fetch_file", Value::from("fetch.git")),
            ("grid_run_spec", Value::Unset),
            ("grid_workdir_root", Value::from("")),
        ]);
        Self {
            descriptor: UnitDescriptor::new(GRID_SUBMIT)
                .requires([GRID_BASE])
                .defaults(defaults)
                .runs_for([NEW_REQUEST, SYNC_REQUEST]),
        }
    }
}

impl Default for GridSubmit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Unit for GridSubmit {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    fn setup(&self, config: &mut ConfigStore) -> Result<(), UnitError> {
        SubmitConfig::from_store(config)?;
        ServerConfig::from_store(config)?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<(), UnitError> {
        let event = ctx.current_event()?.clone();
        let request = event.request()?;
        let grid = GridConfig::from_store(&ctx.config)?;
        let submit = SubmitConfig::from_store(&ctx.config)?;
        let server = ServerConfig::from_store(&ctx.config)?;
        let key = request.key();
        let remote = Arc::clone(&ctx.deps.remote);

        tracing::info!(%key, revision = request.head.checkout(), "submitting grid job");

        let target = grid.target();
        let session = match remote.connect(&target).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(
                    %key,
                    host = %target.destination(),
                    error = %e,
                    "grid connect failed"
                );
                let payload = StatusPayload::new(Status::Error, request.number)
                    .description("Error connecting to the grid.");
                ctx.replace_event(Event::with_payload(STATUS_RELAY, &payload)?);
                return Ok(());
            }
        };

        let submission = Submission {
            remote: remote.as_ref(),
            session: &session,
            config: &submit,
            callback_url: server.endpoint(STATUS_ROUTE),
            request: &request,
            event: event.name.as_str(),
            dir: submit.working_dir(&key.dir_name()),
            key,
        };
        let outcome = submission.run(&mut ctx.jobs).await;
        remote.close(session).await;

        // Failures skip reconciliation: a record is only dropped by a cancel
        // or by a callback through the status route.
        let (name, payload) = match outcome {
            Ok(record) => {
                tracing::info!(
                    number = request.number,
                    grid_id = %record.grid_id,
                    report_url = %record.report_url,
                    "grid job submitted"
                );
                let payload = StatusPayload::new(Status::Pending, request.number)
                    .target_url(record.report_url)
                    .description("Grid job submitted.");
                (STATUS_UPDATE, payload)
            }
            Err(Abort::Step(description)) => {
                let payload =
                    StatusPayload::new(Status::Error, request.number).description(description);
                (STATUS_RELAY, payload)
            }
            Err(Abort::Unit(e)) => return Err(e),
        };
        ctx.replace_event(Event::with_payload(name, &payload)?);
        Ok(())
    }
}

/// Why a submission stopped early.
enum Abort {
    /// A remote step failed; the description is relayed as the build status.
    Step(String),
    Unit(UnitError),
}

impl From<CacheError> for Abort {
    fn from(e: CacheError) -> Self {
        Abort::Unit(e.into())
    }
}

const CALLBACK_FAILURE: &str = "Error appending grid callbacks.";

struct Submission<'a> {
    remote: &'a dyn RemoteShell,
    session: &'a RemoteSession,
    config: &'a SubmitConfig,
    callback_url: String,
    request: &'a RequestDescriptor,
    event: &'a str,
    key: JobKey,
    /// Remote working directory for this key.
    dir: String,
}

impl Submission<'_> {
    async fn run(&self, jobs: &mut JobCache) -> Result<JobRecord, Abort> {
        self.supersede(jobs).await?;

        self.step(remove_dir(&self.dir), "Error cleaning the job directory.").await?;
        self.provision_scripts().await?;

        let revision = self.request.head.checkout();
        let fetch = control_files::fetch_descriptor(
            &self.request.head.clone_url,
            &self.request.repository,
            revision,
        );
        let fetch_path = self.path(&self.config.fetch_file);
        self.step(write_file(&fetch_path, &fetch), "Error overwriting the fetch file.").await?;

        let spec_path = self.path(&self.config.run_spec);
        let output = self.step(cat(&spec_path), "Error reading the run spec.").await?;
        let mut spec = RunSpec::new(output.stdout);

        let pre = self.ensure_hook("pre_all", &spec_path, &mut spec).await?;
        let callback = control_files::pre_callback(self.request.number, &self.callback_url);
        self.step(append_file(&self.path(&pre), &callback), CALLBACK_FAILURE).await?;

        let post = self.ensure_hook("post_all", &spec_path, &mut spec).await?;
        let callback = control_files::post_callback(self.request.number, &self.callback_url);
        self.step(append_file(&self.path(&post), &callback), CALLBACK_FAILURE).await?;

        self.set_option(&spec_path, &mut spec, "always_run_post_all", "true").await?;

        let absolute = self.absolute_dir().await?;
        self.step(
            write_file(&self.path(MANIFEST_FILE), &control_files::manifest(&absolute)),
            "Error creating the jobdir.scp file.",
        )
        .await?;
        let edit = match control_files::inputs_edit(&spec) {
            InputsEdit::Append(value) => append_file(&spec_path, &spec.append("inputs", &value)),
            InputsEdit::Replace(value) => {
                spec.replace("inputs", &value);
                sed_replace_line(&spec_path, "inputs", &format!("inputs = {value}"))
            }
        };
        self.step(edit, "Error adding jobdir.scp to inputs.").await?;

        let record =
            self.submit().await?.with_meta("revision", revision).with_meta("event", self.event);
        jobs.insert(self.key.clone(), record.clone())?;
        Ok(record)
    }

    /// Cancel and forget any job already recorded for this key.
    async fn supersede(&self, jobs: &mut JobCache) -> Result<(), Abort> {
        let Some(old) = jobs.get(&self.key).cloned() else {
            return Ok(());
        };
        tracing::info!(key = %self.key, grid_id = %old.grid_id, "cancelling superseded grid job");

        let kill = RemoteCommand::raw(&self.config.kill_cmd).arg(&old.grid_id);
        match self.remote.run(self.session, &kill).await {
            Ok(output) if !output.success() => {
                // The grid refuses to kill jobs that already finished
                tracing::warn!(
                    grid_id = %old.grid_id,
                    stderr = %output.stderr.trim(),
                    "kill reported failure"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(grid_id = %old.grid_id, error = %e, "kill failed");
                return Err(Abort::Step("Error killing the existing grid job.".into()));
            }
        }
        self.step(remove_dir(&old.working_dir), "Error removing the old job directory.").await?;
        jobs.remove(&self.key)?;
        Ok(())
    }

    async fn provision_scripts(&self) -> Result<(), Abort> {
        match &self.config.scripts {
            ScriptsSource::Git(url) => {
                let clone = RemoteCommand::new("git").arg("clone").arg(url).arg(&self.dir);
                self.step(clone, "Error cloning grid scripts.").await?;
            }
            ScriptsSource::Zip(url) => {
                let unpack = RemoteCommand::new("curl")
                    .args(["-L", "-o", SCRIPTS_ARCHIVE])
                    .arg(url)
                    .and_then(mkdir(&self.dir))
                    .and_then(
                        RemoteCommand::new("unzip")
                            .args(["-q", "-d"])
                            .arg(&self.dir)
                            .arg(SCRIPTS_ARCHIVE),
                    )
                    .and_then(RemoteCommand::new("rm").arg("-f").arg(SCRIPTS_ARCHIVE));
                self.step(unpack, "Error unzipping grid scripts.").await?;

                // An archive holding a single top-level directory is flattened
                let ls = RemoteCommand::new("ls").arg(&self.dir);
                let listing = self.step(ls, "Error listing grid scripts.").await?;
                if let [nested] = listing.lines().as_slice() {
                    let nested = self.path(nested);
                    // The glob must stay unquoted, so this line is assembled by hand
                    let mv = format!("mv {}/* {}", quote(&nested), quote(&self.dir));
                    let flatten =
                        RemoteCommand::raw(&mv).and_then(RemoteCommand::new("rmdir").arg(&nested));
                    self.step(flatten, "Error moving grid scripts.").await?;
                }
            }
        }
        Ok(())
    }

    /// Hook script for `task`, creating an executable stub and registering
    /// it in the run spec when the spec names none.
    async fn ensure_hook(
        &self,
        task: &str,
        spec_path: &str,
        spec: &mut RunSpec,
    ) -> Result<String, Abort> {
        if let Some(existing) = spec.value(task).filter(|v| !v.is_empty()) {
            return Ok(existing.to_string());
        }
        let file = format!("{task}.sh");
        let path = self.path(&file);
        let failure = format!("Error creating the {task} hook.");
        self.step(write_file(&path, HOOK_STUB).and_then(chmod("755", &path)), &failure).await?;
        self.step(append_file(spec_path, &spec.append(task, &file)), &failure).await?;
        Ok(file)
    }

    async fn set_option(
        &self,
        spec_path: &str,
        spec: &mut RunSpec,
        key: &str,
        value: &str,
    ) -> Result<(), Abort> {
        let failure = format!("Error setting {key} in the run spec.");
        match spec.value(key) {
            Some(current) if current == value => Ok(()),
            Some(_) => {
                spec.replace(key, value);
                let line = format!("{key} = {value}");
                self.step(sed_replace_line(spec_path, key, &line), &failure).await?;
                Ok(())
            }
            None => {
                self.step(append_file(spec_path, &spec.append(key, value)), &failure).await?;
                Ok(())
            }
        }
    }

    /// The working directory as an absolute path on the submit host.
    async fn absolute_dir(&self) -> Result<String, Abort> {
        let pwd = cd(&self.dir).and_then(RemoteCommand::new("pwd"));
        let output = self.step(pwd, "Error locating the job directory.").await?;
        Ok(output.lines().last().map(|l| l.trim().to_string()).unwrap_or_else(|| self.dir.clone()))
    }

    /// Submit the run spec and read the grid id and report URL.
    async fn submit(&self) -> Result<JobRecord, Abort> {
        let command = cd(&self.dir)
            .and_then(RemoteCommand::raw(&self.config.submit_cmd).arg(&self.config.run_spec));
        let output = match self.remote.run(self.session, &command).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "grid submit failed");
                return Err(Abort::Step("Error submitting the grid job.".into()));
            }
        };
        // The submit tool reports errors on stderr while still exiting zero
        if output.has_stderr() {
            let stderr = output.stderr.trim().to_string();
            tracing::warn!(stderr = %stderr, "grid job unsuccessfully submitted");
            return Err(Abort::Step(stderr));
        }
        if !output.success() {
            tracing::warn!(exit_code = ?output.exit_code, "grid submit exited with failure");
            return Err(Abort::Step("Error submitting the grid job.".into()));
        }
        parse_submit_output(&output, &self.dir)
            .ok_or_else(|| Abort::Step("Error reading the grid submit output.".into()))
            .map(|record| record.with_meta("submitted_at", chrono::Utc::now().to_rfc3339()))
    }

    /// Run one provisioning step; any failure aborts with `failure`.
    async fn step(&self, command: RemoteCommand, failure: &str) -> Result<RemoteOutput, Abort> {
        tracing::debug!(command = %command, "remote step");
        match self.remote.run(self.session, &command).await {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => {
                tracing::warn!(
                    command = %command,
                    exit_code = ?output.exit_code,
                    stderr = %output.stderr.trim(),
                    "remote step failed"
                );
                Err(Abort::Step(failure.to_string()))
            }
            Err(e) => {
                tracing::warn!(command = %command, error = %e, "remote step failed");
                Err(Abort::Step(failure.to_string()))
            }
        }
    }

    fn path(&self, file: &str) -> String {
        format!("{}/{}", self.dir, file)
    }
}

/// First line's last word is the grid id; the last line is the report URL.
fn parse_submit_output(output: &RemoteOutput, working_dir: &str) -> Option<JobRecord> {
    let lines = output.lines();
    let grid_id = lines.first()?.split_whitespace().last()?;
    let report_url = lines.last()?.trim();
    Some(JobRecord::new(grid_id, report_url, working_dir))
}

#[cfg(test)]
#[path = "grid_submit_tests.rs"]
mod tests;
