// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serde coverage for every Request and Response variant.

use gr_core::test_support::strategies::{arb_job_key, arb_job_record};
use gr_core::{Event, JobKey, JobRecord};
use proptest::prelude::*;
use serde_json::json;

use super::wire::{decode, encode};
use super::*;

fn all_requests() -> Vec<Request> {
    vec![
        Request::Ping,
        Request::Event { event: Event::new("new-request", json!({"number": 1})) },
        Request::Deliver { route: "/gridstatus".into(), payload: json!({"status": "success"}) },
        Request::Jobs,
        Request::Status,
        Request::Shutdown,
    ]
}

fn all_responses() -> Vec<Response> {
    vec![
        Response::Ok,
        Response::Pong,
        Response::Event { accepted: false },
        Response::Jobs {
            jobs: vec![JobEntry {
                key: JobKey::new("acme", "widget", 42),
                record: JobRecord::builder().build(),
            }],
        },
        Response::Status { uptime_secs: 3, units: vec!["base".into()], jobs_active: 1 },
        Response::ShuttingDown,
        Response::Error { message: "boom".into() },
    ]
}

#[test]
fn every_request_roundtrips() {
    for request in all_requests() {
        let back: Request = decode(&encode(&request).unwrap()).unwrap();
        assert_eq!(back, request);
    }
}

#[test]
fn every_response_roundtrips() {
    for response in all_responses() {
        let back: Response = decode(&encode(&response).unwrap()).unwrap();
        assert_eq!(back, response);
    }
}

#[yare::parameterized(
    ping     = { r#"{"type":"Ping"}"#,                                      Request::Ping },
    shutdown = { r#"{"type":"Shutdown"}"#,                                  Request::Shutdown },
    deliver  = { r#"{"type":"Deliver","route":"/hook","payload":null}"#,    Request::Deliver { route: "/hook".into(), payload: serde_json::Value::Null } },
)]
fn request_tags_are_stable(raw: &str, expected: Request) {
    let parsed: Request = decode(raw.as_bytes()).unwrap();
    assert_eq!(parsed, expected);
}

proptest! {
    #[test]
    fn jobs_response_roundtrips(
        entries in prop::collection::vec((arb_job_key(), arb_job_record()), 0..5)
    ) {
        let response = Response::Jobs {
            jobs: entries.into_iter().map(|(key, record)| JobEntry { key, record }).collect(),
        };
        let back: Response = decode(&encode(&response).unwrap()).unwrap();
        prop_assert_eq!(back, response);
    }
}
