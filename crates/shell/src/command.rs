// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed builder for remote shell command lines.

use crate::quote::quote;
use crate::sed::{sed_escape_pattern, sed_escape_replacement};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Redirect {
    Truncate(String),
    Append(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Simple {
    words: Vec<String>,
    redirect: Option<Redirect>,
}

impl Simple {
    fn render(&self) -> String {
        let mut line = self.words.join(" ");
        match &self.redirect {
            Some(Redirect::Truncate(path)) => {
                line.push_str(" > ");
                line.push_str(&quote(path));
            }
            Some(Redirect::Append(path)) => {
                line.push_str(" >> ");
                line.push_str(&quote(path));
            }
            None => {}
        }
        line
    }
}

/// A command line for the remote host: one or more simple commands joined
/// with `&&`. Builder methods apply to the last simple command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    chain: Vec<Simple>,
}

impl RemoteCommand {
    /// Start a command with a quoted program name.
    pub fn new(program: &str) -> Self {
        Self { chain: vec![Simple { words: vec![quote(program)], redirect: None }] }
    }

    /// Start a command with an operator-supplied prefix, passed through verbatim.
    ///
    /// Used for configured commands such as `nmi_submit` or `nmi_rm -f` that
    /// may carry their own flags.
    pub fn raw(prefix: &str) -> Self {
        Self { chain: vec![Simple { words: vec![prefix.trim().to_string()], redirect: None }] }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        if let Some(last) = self.chain.last_mut() {
            last.words.push(quote(arg.as_ref()));
        }
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Redirect stdout to `path`, truncating.
    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        if let Some(last) = self.chain.last_mut() {
            last.redirect = Some(Redirect::Truncate(path.into()));
        }
        self
    }

    /// Redirect stdout to `path`, appending.
    pub fn append_to(mut self, path: impl Into<String>) -> Self {
        if let Some(last) = self.chain.last_mut() {
            last.redirect = Some(Redirect::Append(path.into()));
        }
        self
    }

    /// Run `next` only if this command succeeds.
    pub fn and_then(mut self, next: RemoteCommand) -> Self {
        self.chain.extend(next.chain);
        self
    }

    pub fn render(&self) -> String {
        self.chain.iter().map(Simple::render).collect::<Vec<_>>().join(" && ")
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Replace the contents of `path` with `contents`.
pub fn write_file(path: &str, contents: &str) -> RemoteCommand {
    RemoteCommand::new("printf").arg("%s").arg(contents).redirect_to(path)
}

/// Append `contents` to `path`, creating it if needed.
pub fn append_file(path: &str, contents: &str) -> RemoteCommand {
    RemoteCommand::new("printf").arg("%s").arg(contents).append_to(path)
}

pub fn remove_dir(path: &str) -> RemoteCommand {
    RemoteCommand::new("rm").arg("-rf").arg(path)
}

pub fn mkdir(path: &str) -> RemoteCommand {
    RemoteCommand::new("mkdir").arg("-p").arg(path)
}

pub fn cat(path: &str) -> RemoteCommand {
    RemoteCommand::new("cat").arg(path)
}

pub fn cd(path: &str) -> RemoteCommand {
    RemoteCommand::new("cd").arg(path)
}

pub fn chmod(mode: &str, path: &str) -> RemoteCommand {
    RemoteCommand::new("chmod").arg(mode).arg(path)
}

/// Rewrite every `key = ...` line of `path` in place to `new_line`.
pub fn sed_replace_line(path: &str, key: &str, new_line: &str) -> RemoteCommand {
    let script = format!(
        "s/^[[:space:]]*{}[[:space:]]*=.*$/{}/",
        sed_escape_pattern(key),
        sed_escape_replacement(new_line)
    );
    RemoteCommand::new("sed").arg("-i").arg(script).arg(path)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
