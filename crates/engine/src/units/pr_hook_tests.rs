// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gr_core::test_support::pull_request_webhook;
use serde_json::json;

fn request() -> RequestDescriptor {
    RequestDescriptor::builder().build()
}

#[yare::parameterized(
    opened      = { "opened",      NEW_REQUEST },
    synchronize = { "synchronize", SYNC_REQUEST },
)]
fn build_actions_become_requests(action: &str, expected: &str) {
    let event = PrHook::new().intake(&pull_request_webhook(action, &request())).unwrap().unwrap();
    assert_eq!(event.name, expected);
    assert_eq!(event.request().unwrap(), request());
}

#[yare::parameterized(
    closed      = { "closed" },
    labeled     = { "labeled" },
    reopened    = { "reopened" },
    edited      = { "edited" },
)]
fn other_actions_are_ignored(action: &str) {
    let payload = pull_request_webhook(action, &request());
    assert_eq!(PrHook::new().intake(&payload).unwrap(), None);
}

#[test]
fn payload_without_pull_request_is_ignored() {
    let ping = json!({"zen": "Keep it logically awesome.", "hook_id": 1});
    assert_eq!(PrHook::new().intake(&ping).unwrap(), None);
}

#[test]
fn key_follows_the_base_repository() {
    let mut head = request().head;
    head.owner = "fork-owner".into();
    let payload = pull_request_webhook("opened", &RequestDescriptor::builder().head(head).build());

    let event = PrHook::new().intake(&payload).unwrap().unwrap();
    let req = event.request().unwrap();

    assert_eq!(req.key(), gr_core::JobKey::new("acme", "widget", 42));
    assert_eq!(req.head.owner, "fork-owner");
}

#[test]
fn deleted_fork_is_an_error() {
    let mut payload = pull_request_webhook("opened", &request());
    payload["pull_request"]["head"]["repo"] = serde_json::Value::Null;

    let err = PrHook::new().intake(&payload).unwrap_err();
    assert_eq!(err.to_string(), "pull request #42 has no head repository");
}

#[test]
fn malformed_pull_request_is_an_error() {
    let payload = json!({"action": "opened", "number": 1, "pull_request": {"head": 3}});
    assert!(matches!(PrHook::new().intake(&payload), Err(UnitError::Json(_))));
}

#[test]
fn missing_sha_falls_back_to_ref() {
    let mut payload = pull_request_webhook("synchronize", &request());
    payload["pull_request"]["head"]
        .as_object_mut()
        .unwrap()
        .remove("sha");

    let req = PrHook::new().intake(&payload).unwrap().unwrap().request().unwrap();
    assert_eq!(req.head.checkout(), "feature");
}
