// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events flowing through the dispatcher.
//!
//! An event is an immutable `(name, data)` pair. The name routes it to the
//! units that declared interest; the data is an opaque JSON payload that
//! units read through typed views such as [`RequestDescriptor`] and
//! [`StatusPayload`].

use crate::job::JobKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;

/// Raw webhook payload delivered by the front end.
pub const WEBHOOK: &str = "webhook";
/// A new pull request asks for a build.
pub const NEW_REQUEST: &str = "new-request";
/// An existing pull request was updated; supersedes any running build.
pub const SYNC_REQUEST: &str = "sync-request";
/// Build status reported by the grid or by the submitting unit.
pub const STATUS_UPDATE: &str = "status-update";
/// Reconciled status, ready for the downstream notifier.
pub const STATUS_RELAY: &str = "status-relay";

/// Name tag of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventName(pub SmolStr);

impl EventName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Payload could not be read as the expected shape.
#[derive(Debug, Error)]
#[error("invalid {expected} payload for event '{event}': {source}")]
pub struct PayloadError {
    pub event: EventName,
    pub expected: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// A named occurrence with an opaque payload.
///
/// Two events are equal when both name and data are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: EventName,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(name: impl Into<EventName>, data: serde_json::Value) -> Self {
        Self { name: name.into(), data }
    }

    /// Event with a typed payload.
    pub fn with_payload<T: Serialize>(
        name: impl Into<EventName>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self { name: name.into(), data: serde_json::to_value(payload)? })
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Read the payload as `T`.
    pub fn payload<T: DeserializeOwned>(&self, expected: &'static str) -> Result<T, PayloadError> {
        serde_json::from_value(self.data.clone()).map_err(|source| PayloadError {
            event: self.name.clone(),
            expected,
            source,
        })
    }

    pub fn request(&self) -> Result<RequestDescriptor, PayloadError> {
        self.payload("request")
    }

    pub fn status(&self) -> Result<StatusPayload, PayloadError> {
        self.payload("status")
    }

    /// Short description for logs.
    pub fn log_summary(&self) -> String {
        match self.name.as_str() {
            NEW_REQUEST | SYNC_REQUEST => match self.request() {
                Ok(req) => format!("{} key={} head={}", self.name, req.key(), req.head.checkout()),
                Err(_) => self.name.to_string(),
            },
            STATUS_UPDATE | STATUS_RELAY => match self.status() {
                Ok(st) => format!("{} number={} status={}", self.name, st.number, st.status),
                Err(_) => self.name.to_string(),
            },
            _ => self.name.to_string(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} event holding {}", self.name, self.data)
    }
}

/// One side (head or base) of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub owner: String,
    pub repository: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(default)]
    pub clone_url: String,
}

impl Revision {
    /// What the remote build should check out: the sha if known, else the ref.
    pub fn checkout(&self) -> &str {
        match &self.sha {
            Some(sha) if !sha.is_empty() => sha,
            _ => &self.ref_name,
        }
    }
}

/// Payload of `new-request` / `sync-request` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub owner: String,
    pub repository: String,
    pub number: u64,
    pub head: Revision,
    #[serde(default)]
    pub base: Revision,
}

impl RequestDescriptor {
    pub fn key(&self) -> JobKey {
        JobKey::new(&self.owner, &self.repository, self.number)
    }
}

crate::test_builder! {
    pub struct RequestDescriptorBuilder => RequestDescriptor {
        into {
            owner: String = "acme",
            repository: String = "widget",
        }
        set {
            number: u64 = 42,
            head: Revision = Revision {
                owner: "contributor".to_string(),
                repository: "widget".to_string(),
                ref_name: "feature".to_string(),
                sha: Some("0123abcd".to_string()),
                clone_url: "https://example.com/contributor/widget.git".to_string(),
            },
            base: Revision = Revision {
                owner: "acme".to_string(),
                repository: "widget".to_string(),
                ref_name: "main".to_string(),
                sha: None,
                clone_url: "https://example.com/acme/widget.git".to_string(),
            },
        }
    }
}

/// Build status as understood by the source-hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Success,
    Failure,
    Error,
}

impl Status {
    /// Success, failure and error close out a job record.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Pending)
    }

    /// Default human-facing description.
    pub fn description(&self) -> &'static str {
        match self {
            Status::Pending => "Patience, discipline.",
            Status::Success => "Great Success!",
            Status::Failure => "It turns out failure *was* an option.",
            Status::Error => "Error: does not compute.",
        }
    }
}

crate::simple_display! {
    Status {
        Pending => "pending",
        Success => "success",
        Failure => "failure",
        Error => "error",
    }
}

/// Payload of `status-update` / `status-relay` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: Status,
    pub number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StatusPayload {
    pub fn new(status: Status, number: u64) -> Self {
        Self { status, number, target_url: None, description: None }
    }

    crate::chain_setters! {
        option {
            target_url: String,
            description: String,
        }
    }

    /// True when the payload carries a usable callback URL.
    pub fn has_target_url(&self) -> bool {
        self.target_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
