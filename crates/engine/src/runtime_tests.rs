// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{acme_key, setup};
use gr_adapters::{RemoteError, RemoteOutput};
use gr_core::event::STATUS_RELAY;
use gr_core::test_support::{pull_request_webhook, status_update_event};
use gr_core::{RequestDescriptor, Status};
use serde_json::json;

fn opened() -> serde_json::Value {
    pull_request_webhook("opened", &RequestDescriptor::builder().build())
}

fn synchronized(sha: &str) -> serde_json::Value {
    let mut head = RequestDescriptor::builder().build().head;
    head.sha = Some(sha.to_string());
    pull_request_webhook("synchronize", &RequestDescriptor::builder().head(head).build())
}

fn form_status(status: &str) -> serde_json::Value {
    json!({ "status": format!(r#"{{"status":"{status}","number":42}}"#) })
}

#[tokio::test]
async fn default_units_resolve_in_dependency_order() {
    let ctx = setup();
    assert_eq!(
        ctx.runtime.units(),
        vec![
            "base",
            "source-host",
            "pr-hook",
            "grid-base",
            "grid-submit",
            "grid-status",
            "status-notify",
            "grid",
        ]
    );
    assert_eq!(ctx.runtime.routes(), vec!["/hook", "/gridstatus"]);
}

#[tokio::test]
async fn opened_pull_request_submits_and_reports_pending() {
    let mut ctx = setup();

    let last = ctx.runtime.deliver("/hook", &opened()).await.unwrap().unwrap();

    // The pending update is reconciled and relayed in the same pass
    assert_eq!(last.name, STATUS_RELAY);
    let status = last.status().unwrap();
    assert_eq!(status.status, Status::Pending);
    assert_eq!(status.target_url.as_deref(), Some("https://grid.example/report/778"));

    let record = ctx.job(&acme_key()).unwrap();
    assert_eq!(record.grid_id, "778");
    assert_eq!(record.report_url, "https://grid.example/report/778");
    assert_eq!(record.working_dir, "acme--widget--42");
    assert_eq!(record.metadata.get("revision").map(String::as_str), Some("0123abcd"));
    assert_eq!(record.metadata.get("event").map(String::as_str), Some("new-request"));

    let commands = ctx.remote.commands();
    assert_eq!(commands[0], "rm -rf acme--widget--42");
    assert!(commands[1].starts_with("git clone https://example.com/acme/widget-grid.git"));
    assert!(commands.iter().any(|c| c.contains("0123abcd") && c.contains("fetch.git")));
    assert!(commands.iter().any(|c| c.ends_with(">> acme--widget--42/pre_all.sh")));
    assert!(commands.iter().any(|c| c.ends_with(">> acme--widget--42/post_all.sh")));
    assert_eq!(
        commands.last().map(String::as_str),
        Some("cd acme--widget--42 && nmi_submit widget.run-spec")
    );
    assert_eq!(ctx.remote.open_sessions(), 0);

    let reports = ctx.notifier.calls();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, Status::Pending);
    assert_eq!(reports[0].description, "Grid job submitted.");
}

#[tokio::test]
async fn synchronize_supersedes_the_running_job() {
    let mut ctx = setup();
    ctx.runtime.deliver("/hook", &opened()).await.unwrap();
    ctx.remote.respond(
        "nmi_submit",
        RemoteOutput::stdout("Submitted run with GID 779\nhttps://grid.example/report/779\n"),
    );
    let first = ctx.remote.commands().len();

    ctx.runtime.deliver("/hook", &synchronized("4567cdef")).await.unwrap();

    let commands = ctx.remote.commands()[first..].to_vec();
    assert_eq!(commands[0], "nmi_rm 778");
    assert_eq!(commands[1], "rm -rf acme--widget--42");
    assert_eq!(commands[2], "rm -rf acme--widget--42");

    let record = ctx.job(&acme_key()).unwrap();
    assert_eq!(record.grid_id, "779");
    assert_eq!(record.metadata.get("revision").map(String::as_str), Some("4567cdef"));
    assert_eq!(record.metadata.get("event").map(String::as_str), Some("sync-request"));
    assert_eq!(ctx.runtime.jobs().len(), 1);
}

#[tokio::test]
async fn terminal_callback_fills_report_url_and_forgets_the_job() {
    let mut ctx = setup();
    ctx.runtime.deliver("/hook", &opened()).await.unwrap();

    let last = ctx.runtime.deliver("/gridstatus", &form_status("success")).await.unwrap().unwrap();

    assert_eq!(last.name, STATUS_RELAY);
    assert_eq!(last.data["target_url"], "https://grid.example/report/778");
    assert!(ctx.job(&acme_key()).is_none());
    assert!(ctx.reopen_cache().is_empty());

    let reports = ctx.notifier.calls();
    let done = reports.last().unwrap();
    assert_eq!(done.status, Status::Success);
    assert_eq!(done.target_url.as_deref(), Some("https://grid.example/report/778"));
    assert_eq!(done.description, Status::Success.description());
}

#[tokio::test]
async fn pending_callback_keeps_the_job() {
    let mut ctx = setup();
    ctx.runtime.deliver("/hook", &opened()).await.unwrap();

    ctx.runtime.deliver("/gridstatus", &form_status("pending")).await.unwrap();

    assert!(ctx.job(&acme_key()).is_some());
}

#[tokio::test]
async fn status_for_an_unknown_job_is_relayed_unchanged() {
    let mut ctx = setup();
    let event = status_update_event(Status::Failure, 9, None);

    let last = ctx.runtime.handle_event(event.clone()).await.unwrap();

    assert_eq!(last, Event::new(STATUS_RELAY, event.data));
    let reports = ctx.notifier.calls();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].number, 9);
    assert_eq!(reports[0].target_url, None);
}

#[tokio::test]
async fn submitted_job_survives_a_restart() {
    let mut ctx = setup();
    ctx.runtime.deliver("/hook", &opened()).await.unwrap();

    let reopened = ctx.reopen_cache();
    assert_eq!(reopened.get(&acme_key()).map(|r| r.grid_id.as_str()), Some("778"));
}

#[tokio::test]
async fn connect_failure_reports_error_without_a_record() {
    let mut ctx = setup();
    ctx.remote.fail_connect("no route to host");

    let last = ctx.runtime.deliver("/hook", &opened()).await.unwrap().unwrap();

    let status = last.status().unwrap();
    assert_eq!(status.status, Status::Error);
    assert_eq!(status.description.as_deref(), Some("Error connecting to the grid."));
    assert!(ctx.runtime.jobs().is_empty());
    assert!(ctx.remote.commands().is_empty());
}

#[tokio::test]
async fn unknown_route_is_rejected() {
    let mut ctx = setup();
    let err = ctx.runtime.deliver("/nope", &json!({})).await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownRoute(ref r) if r == "/nope"));
}

#[tokio::test]
async fn irrelevant_payloads_are_ignored() {
    let mut ctx = setup();
    assert_eq!(ctx.runtime.deliver("/hook", &json!({"zen": "ping"})).await.unwrap(), None);
    let closed = pull_request_webhook("closed", &RequestDescriptor::builder().build());
    assert_eq!(ctx.runtime.deliver("/hook", &closed).await.unwrap(), None);
    assert!(ctx.remote.calls().is_empty());
}

#[tokio::test]
async fn malformed_payload_names_the_route_owner() {
    let mut ctx = setup();
    let err = ctx
        .runtime
        .deliver("/gridstatus", &json!({"status": "bogus", "number": 1}))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Intake { ref unit, .. } if unit == "grid-status"));
}

#[tokio::test]
async fn intake_does_not_dispatch() {
    let ctx = setup();
    let event = ctx.runtime.intake("/hook", &opened()).unwrap().unwrap();
    assert_eq!(event.name, "new-request");
    assert_eq!(event.request().unwrap(), RequestDescriptor::builder().build());
    assert!(ctx.remote.calls().is_empty());
}

#[tokio::test]
async fn notifier_failure_fails_the_dispatch() {
    let mut ctx = setup();
    ctx.notifier.fail_with("rate limited");

    let err = ctx
        .runtime
        .handle_event(status_update_event(Status::Success, 42, Some("https://ci.example/1")))
        .await
        .unwrap_err();

    let RuntimeError::Dispatch(err) = err else { panic!("expected dispatch error, got {err}") };
    assert_eq!(err.unit(), "status-notify");
    assert_eq!(err.to_string(), "unit 'status-notify' failed: notify: send failed: rate limited");
}

#[tokio::test]
async fn submit_stderr_becomes_the_error_description() {
    let mut ctx = setup();
    ctx.remote.respond("nmi_submit", RemoteOutput::stderr("quota exceeded"));

    let last = ctx.runtime.deliver("/hook", &opened()).await.unwrap().unwrap();

    let status = last.status().unwrap();
    assert_eq!(status.status, Status::Error);
    assert_eq!(status.description.as_deref(), Some("quota exceeded"));
    assert!(ctx.runtime.jobs().is_empty());
}

#[tokio::test]
async fn report_lists_units_config_and_jobs() {
    let mut ctx = setup();
    let empty = ctx.runtime.report();
    assert!(empty.starts_with(&format!("gridrelay {}\n", env!("CARGO_PKG_VERSION"))));
    assert!(empty.contains("units: base, source-host, pr-hook,"));
    assert!(empty.contains("  repo_owner = \"acme\""));
    assert!(empty.contains("  (no jobs)"));

    ctx.runtime.deliver("/hook", &opened()).await.unwrap();
    let report = ctx.runtime.report();
    assert!(report.contains(
        "  acme/widget#42: grid_id=778 report_url=https://grid.example/report/778 \
         working_dir=acme--widget--42"
    ));
    assert!(!report.contains("(no jobs)"));
}

#[tokio::test]
async fn context_event_is_cleared_between_passes() {
    let mut ctx = setup();
    ctx.runtime.deliver("/hook", &opened()).await.unwrap();
    assert!(ctx.runtime.context_mut().event().is_none());
}

#[tokio::test]
async fn unreachable_grid_keeps_the_running_job() {
    let mut ctx = setup();
    ctx.runtime.deliver("/hook", &opened()).await.unwrap();
    let before = ctx.remote.commands().len();
    ctx.remote.fail_connect("no route to host");

    let last = ctx.runtime.deliver("/hook", &synchronized("beef")).await.unwrap().unwrap();

    assert_eq!(last.name, STATUS_RELAY);
    assert_eq!(last.status().unwrap().status, Status::Error);
    let record = ctx.job(&acme_key()).unwrap();
    assert_eq!(record.grid_id, "778");
    assert_eq!(ctx.reopen_cache().get(&acme_key()), Some(&record));
    assert_eq!(ctx.remote.commands().len(), before);

    // The next sync can still cancel the job it kept
    ctx.remote.reconnect();
    ctx.runtime.deliver("/hook", &synchronized("cafe")).await.unwrap();
    assert_eq!(ctx.remote.commands()[before], "nmi_rm 778");
}

#[tokio::test]
async fn failed_kill_keeps_the_running_job() {
    let mut ctx = setup();
    ctx.runtime.deliver("/hook", &opened()).await.unwrap();
    ctx.remote.fail_on("nmi_rm", RemoteError::Exec { reason: "connection reset".into() });

    let last = ctx.runtime.deliver("/hook", &synchronized("beef")).await.unwrap().unwrap();

    let status = last.status().unwrap();
    assert_eq!(status.status, Status::Error);
    assert_eq!(status.description.as_deref(), Some("Error killing the existing grid job."));
    assert_eq!(ctx.job(&acme_key()).map(|r| r.grid_id), Some("778".to_string()));
    assert_eq!(ctx.runtime.jobs().len(), 1);

    let reports = ctx.notifier.calls();
    assert_eq!(reports.last().map(|r| r.status), Some(Status::Error));
}
