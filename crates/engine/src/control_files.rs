// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-control file contents written into a job's working directory.
//!
//! Contents are rendered locally and written verbatim with
//! `gr_shell::write_file`/`append_file`. Values substituted into hook
//! scripts are quoted as shell words; the rest are plain text.

use gr_shell::{interpolate, interpolate_shell};
use std::collections::HashMap;

/// Name of the transfer manifest added to the run spec's inputs.
pub const MANIFEST_FILE: &str = "jobdir.scp";

/// Archive name used while unpacking `.zip` scripts.
pub const SCRIPTS_ARCHIVE: &str = "gridrelay-scripts.zip";

/// Body of a hook script the run spec does not provide.
pub const HOOK_STUB: &str = "#!/bin/sh\n";

const FETCH_TEMPLATE: &str = "\
method = git
git_repo = ${repo_url}
git_path = ${repo_dir};cd ${repo_dir};git checkout ${revision}
";

const PRE_CALLBACK_TEMPLATE: &str = r#"
# gridrelay pre_all callback
curl --form status='{"status":"pending","number":${number},"description":"build and test initialized"}' ${callback_url}
"#;

const POST_CALLBACK_TEMPLATE: &str = r#"
# gridrelay post_all callback
val0=`grep "return value 0" ../../run.log | wc -l`
valAny=`grep "return value" ../../run.log | wc -l`

if [ "$val0" = "$valAny" ]
then
    curl --form status='{"status":"success","number":${number},"description":"build and test completed successfully"}' ${callback_url}
else
    curl --form status='{"status":"failure","number":${number},"description":"build and test failed"}' ${callback_url}
fi
"#;

const MANIFEST_TEMPLATE: &str = "\
method = scp
scp_file = ${jobdir}/*
recursive = true
";

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Fetch descriptor telling the grid which revision to check out.
pub fn fetch_descriptor(repo_url: &str, repo_dir: &str, revision: &str) -> String {
    interpolate(
        FETCH_TEMPLATE,
        &vars(&[("repo_url", repo_url), ("repo_dir", repo_dir), ("revision", revision)]),
    )
}

/// Lines appended to the pre-build hook: report `pending`.
pub fn pre_callback(number: u64, callback_url: &str) -> String {
    let number = number.to_string();
    interpolate_shell(
        PRE_CALLBACK_TEMPLATE,
        &vars(&[("number", &number), ("callback_url", callback_url)]),
    )
}

/// Lines appended to the post-build hook: report `success` or `failure`
/// from the task return values in the grid's run log.
pub fn post_callback(number: u64, callback_url: &str) -> String {
    let number = number.to_string();
    interpolate_shell(
        POST_CALLBACK_TEMPLATE,
        &vars(&[("number", &number), ("callback_url", callback_url)]),
    )
}

/// Transfer manifest shipping the whole working directory to the grid.
pub fn manifest(jobdir: &str) -> String {
    interpolate(MANIFEST_TEMPLATE, &vars(&[("jobdir", jobdir)]))
}

/// In-memory copy of a run spec (`key = value` lines) tracking the edits
/// made to the remote file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSpec {
    text: String,
}

impl RunSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Value of the first `key = value` line, trimmed.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.text.lines().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim())
        })
    }

    /// Record an appended `key = value` line and return the exact text to
    /// append, starting on a fresh line.
    pub fn append(&mut self, key: &str, value: &str) -> String {
        let mut chunk = String::new();
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            chunk.push('\n');
        }
        chunk.push_str(&format!("{key} = {value}\n"));
        self.text.push_str(&chunk);
        chunk
    }

    /// Record an in-place rewrite of every `key = ...` line.
    pub fn replace(&mut self, key: &str, value: &str) {
        let trailing = self.text.ends_with('\n');
        let mut lines: Vec<String> = self
            .text
            .lines()
            .map(|line| match line.split_once('=') {
                Some((k, _)) if k.trim() == key => format!("{key} = {value}"),
                _ => line.to_string(),
            })
            .collect();
        if trailing {
            lines.push(String::new());
        }
        self.text = lines.join("\n");
    }
}

/// What has to happen to the run spec's `inputs` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputsEdit {
    /// No `inputs` line: append one.
    Append(String),
    /// Rewrite the existing line to this value.
    Replace(String),
}

/// Add the manifest to the run spec's inputs.
///
/// An empty list gets the manifest alone; a non-empty one gets it after a
/// comma.
pub fn inputs_edit(spec: &RunSpec) -> InputsEdit {
    match spec.value("inputs") {
        None => InputsEdit::Append(MANIFEST_FILE.to_string()),
        Some("") => InputsEdit::Replace(MANIFEST_FILE.to_string()),
        Some(existing) => InputsEdit::Replace(format!("{existing},{MANIFEST_FILE}")),
    }
}

#[cfg(test)]
#[path = "control_files_tests.rs"]
mod tests;
