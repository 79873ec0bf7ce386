// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pull-request webhook intake.
//!
//! `opened` becomes `new-request`, `synchronize` becomes `sync-request`;
//! every other action, and any payload without a pull request, is
//! acknowledged and dropped.

use super::{HOOK_ROUTE, PR_HOOK, SOURCE_HOST};
use crate::unit::{Unit, UnitDescriptor, UnitError};
use gr_core::event::{NEW_REQUEST, SYNC_REQUEST};
use gr_core::{Event, RequestDescriptor, Revision};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Webhook {
    action: String,
    number: u64,
    pull_request: PullRequest,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    head: Side,
    base: Side,
}

#[derive(Debug, Deserialize)]
struct Side {
    #[serde(rename = "ref")]
    ref_name: String,
    #[serde(default)]
    sha: Option<String>,
    /// Null when the fork behind the request was deleted.
    #[serde(default)]
    repo: Option<Repo>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
    owner: Owner,
    #[serde(default)]
    clone_url: String,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

impl Side {
    fn revision(self) -> Option<Revision> {
        let repo = self.repo?;
        Some(Revision {
            owner: repo.owner.login,
            repository: repo.name,
            ref_name: self.ref_name,
            sha: self.sha,
            clone_url: repo.clone_url,
        })
    }
}

pub struct PrHook {
    descriptor: UnitDescriptor,
}

impl PrHook {
    pub fn new() -> Self {
        Self { descriptor: UnitDescriptor::new(PR_HOOK).requires([SOURCE_HOST]).route(HOOK_ROUTE) }
    }
}

impl Default for PrHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit for PrHook {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    fn intake(&self, payload: &serde_json::Value) -> Result<Option<Event>, UnitError> {
        if payload.get("pull_request").is_none() {
            return Ok(None);
        }
        let hook: Webhook = serde_json::from_value(payload.clone())?;
        let name = match hook.action.as_str() {
            "opened" => NEW_REQUEST,
            "synchronize" => SYNC_REQUEST,
            other => {
                tracing::debug!(
                    action = other,
                    number = hook.number,
                    "ignoring pull request action"
                );
                return Ok(None);
            }
        };

        // The job key follows the base repository, where the request lives
        let base = hook
            .pull_request
            .base
            .revision()
            .ok_or_else(|| UnitError::Invalid("pull request has no base repository".into()))?;
        let head = hook.pull_request.head.revision().ok_or_else(|| {
            UnitError::Invalid(format!("pull request #{} has no head repository", hook.number))
        })?;
        let request = RequestDescriptor {
            owner: base.owner.clone(),
            repository: base.repository.clone(),
            number: hook.number,
            head,
            base,
        };
        tracing::info!(key = %request.key(), event = name, "pull request webhook");
        Ok(Some(Event::with_payload(name, &request)?))
    }
}

#[cfg(test)]
#[path = "pr_hook_tests.rs"]
mod tests;
