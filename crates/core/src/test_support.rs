// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::{self, Event, RequestDescriptor, Status, StatusPayload};
use serde_json::json;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for job keys and records.
pub mod strategies {
    use crate::job::{JobKey, JobRecord};
    use proptest::collection::btree_map;
    use proptest::prelude::*;

    pub fn arb_job_key() -> impl Strategy<Value = JobKey> {
        ("[a-z][a-z0-9]{0,7}", "[a-z][a-z0-9_]{0,11}", 1u64..100_000)
            .prop_map(|(owner, repo, number)| JobKey::new(owner, repo, number))
    }

    pub fn arb_job_record() -> impl Strategy<Value = JobRecord> {
        (
            "[0-9]{1,6}",
            "https://[a-z]{3,8}\\.example/[a-z0-9/]{0,12}",
            "[a-z0-9-]{1,24}",
            btree_map("[a-z_]{1,8}", ".{0,16}", 0..4),
        )
            .prop_map(|(grid_id, report_url, working_dir, metadata)| JobRecord {
                grid_id,
                report_url,
                working_dir,
                metadata,
            })
    }
}

// ── Event factory functions ─────────────────────────────────────────────

fn request_event(name: &str, request: &RequestDescriptor) -> Event {
    Event::new(name, serde_json::to_value(request).unwrap_or_default())
}

pub fn new_request_event(request: &RequestDescriptor) -> Event {
    request_event(event::NEW_REQUEST, request)
}

pub fn sync_request_event(request: &RequestDescriptor) -> Event {
    request_event(event::SYNC_REQUEST, request)
}

pub fn status_update_event(status: Status, number: u64, target_url: Option<&str>) -> Event {
    let mut payload = StatusPayload::new(status, number);
    payload.target_url = target_url.map(String::from);
    Event::new(event::STATUS_UPDATE, serde_json::to_value(payload).unwrap_or_default())
}

/// A pull-request webhook body as the source host sends it.
pub fn pull_request_webhook(action: &str, request: &RequestDescriptor) -> serde_json::Value {
    json!({
        "action": action,
        "number": request.number,
        "pull_request": {
            "number": request.number,
            "head": {
                "ref": request.head.ref_name,
                "sha": request.head.sha,
                "repo": {
                    "name": request.head.repository,
                    "owner": { "login": request.head.owner },
                    "clone_url": request.head.clone_url,
                },
            },
            "base": {
                "ref": request.base.ref_name,
                "sha": request.base.sha,
                "repo": {
                    "name": request.base.repository,
                    "owner": { "login": request.base.owner },
                    "clone_url": request.base.clone_url,
                },
            },
        },
        "repository": {
            "name": request.repository,
            "owner": { "login": request.owner },
        },
    })
}
