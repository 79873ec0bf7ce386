// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted remote shell for tests.

use super::{RemoteError, RemoteOutput, RemoteSession, RemoteShell, RemoteTarget};
use async_trait::async_trait;
use gr_shell::RemoteCommand;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Connect { destination: String },
    Run { session: String, command: String },
    Close { session: String },
}

enum Reply {
    Output(RemoteOutput),
    Fail(RemoteError),
}

struct Rule {
    pattern: String,
    reply: Reply,
    once: bool,
}

#[derive(Default)]
struct FakeRemoteState {
    rules: Vec<Rule>,
    connect_error: Option<String>,
    calls: Vec<RemoteCall>,
    next_session: u32,
    open: Vec<String>,
}

/// Fake remote shell that answers commands by substring match.
///
/// One-shot rules are consumed in registration order and win over
/// persistent rules; among persistent rules the latest registration wins.
/// Unmatched commands succeed with empty output.
#[derive(Clone, Default)]
pub struct FakeRemoteShell {
    inner: Arc<Mutex<FakeRemoteState>>,
}

impl FakeRemoteShell {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, pattern: &str, reply: Reply, once: bool) {
        self.inner.lock().rules.push(Rule { pattern: pattern.to_string(), reply, once });
    }

    /// Answer every command containing `pattern` with `output`.
    pub fn respond(&self, pattern: &str, output: RemoteOutput) {
        self.push(pattern, Reply::Output(output), false);
    }

    /// Answer the next command containing `pattern` with `output`.
    pub fn respond_once(&self, pattern: &str, output: RemoteOutput) {
        self.push(pattern, Reply::Output(output), true);
    }

    /// Fail every command containing `pattern`.
    pub fn fail_on(&self, pattern: &str, error: RemoteError) {
        self.push(pattern, Reply::Fail(error), false);
    }

    /// Make `connect` fail with `reason`.
    pub fn fail_connect(&self, reason: &str) {
        self.inner.lock().connect_error = Some(reason.to_string());
    }

    /// Let `connect` succeed again.
    pub fn reconnect(&self) {
        self.inner.lock().connect_error = None;
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.inner.lock().calls.clone()
    }

    /// Rendered command lines, in order.
    pub fn commands(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RemoteCall::Run { command, .. } => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Sessions connected but not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.inner.lock().open.len()
    }
}

#[async_trait]
impl RemoteShell for FakeRemoteShell {
    async fn connect(&self, target: &RemoteTarget) -> Result<RemoteSession, RemoteError> {
        let mut state = self.inner.lock();
        state.calls.push(RemoteCall::Connect { destination: target.destination() });
        if let Some(reason) = &state.connect_error {
            return Err(RemoteError::Connect { host: target.destination(), reason: reason.clone() });
        }
        state.next_session += 1;
        let id = format!("fake-{}", state.next_session);
        state.open.push(id.clone());
        Ok(RemoteSession { id, target: target.clone(), control_path: None })
    }

    async fn run(
        &self,
        session: &RemoteSession,
        command: &RemoteCommand,
    ) -> Result<RemoteOutput, RemoteError> {
        let line = command.render();
        let mut state = self.inner.lock();
        state.calls.push(RemoteCall::Run { session: session.id.clone(), command: line.clone() });
        if !state.open.contains(&session.id) {
            return Err(RemoteError::SessionClosed);
        }

        let once = state.rules.iter().position(|r| r.once && line.contains(&r.pattern));
        if let Some(idx) = once {
            return match state.rules.remove(idx).reply {
                Reply::Output(output) => Ok(output),
                Reply::Fail(error) => Err(error),
            };
        }
        match state.rules.iter().rev().find(|r| !r.once && line.contains(&r.pattern)) {
            Some(Rule { reply: Reply::Output(output), .. }) => Ok(output.clone()),
            Some(Rule { reply: Reply::Fail(error), .. }) => Err(error.clone()),
            None => Ok(RemoteOutput::stdout("")),
        }
    }

    async fn close(&self, session: RemoteSession) {
        let mut state = self.inner.lock();
        state.calls.push(RemoteCall::Close { session: session.id.clone() });
        state.open.retain(|id| id != &session.id);
    }
}
