// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gr_core::{JobKey, JobRecord};
use tempfile::TempDir;
use tokio::net::UnixListener;
use tokio::task::JoinHandle;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Serve one connection: record the request, answer with `response`.
fn serve_once(dir: &TempDir, response: Response) -> (DaemonClient, JoinHandle<Request>) {
    let path = dir.path().join("daemon.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (mut reader, mut writer) = stream.into_split();
        let request = wire::read_request(&mut reader, TIMEOUT).await.unwrap();
        wire::write_response(&mut writer, &response, TIMEOUT).await.unwrap();
        request
    });
    (DaemonClient::new(path, TIMEOUT), handle)
}

#[tokio::test]
async fn missing_socket_means_not_running() {
    let dir = tempfile::tempdir().unwrap();
    let client = DaemonClient::new(dir.path().join("daemon.sock"), TIMEOUT);

    let err = client.jobs().await.unwrap_err();
    assert!(matches!(err, ClientError::DaemonNotRunning(_)));
    assert_eq!(ExitError::from(err).code, EXIT_UNREACHABLE);
}

#[tokio::test]
async fn emit_sends_the_event() {
    let dir = tempfile::tempdir().unwrap();
    let (client, server) = serve_once(&dir, Response::Event { accepted: true });
    let event = Event::new("new-request", serde_json::json!({"number": 42}));

    assert!(client.emit(event.clone()).await.unwrap());
    assert_eq!(server.await.unwrap(), Request::Event { event });
}

#[tokio::test]
async fn deliver_sends_route_and_payload() {
    let dir = tempfile::tempdir().unwrap();
    let (client, server) = serve_once(&dir, Response::Event { accepted: false });

    let accepted = client.deliver("/hook", serde_json::json!({"action": "opened"})).await.unwrap();

    assert!(!accepted);
    assert_eq!(
        server.await.unwrap(),
        Request::Deliver { route: "/hook".into(), payload: serde_json::json!({"action": "opened"}) }
    );
}

#[tokio::test]
async fn daemon_errors_are_rejections() {
    let dir = tempfile::tempdir().unwrap();
    let (client, _server) =
        serve_once(&dir, Response::Error { message: "no active unit owns route '/x'".into() });

    let err = client.deliver("/x", serde_json::Value::Null).await.unwrap_err();
    assert_eq!(err.to_string(), "daemon error: no active unit owns route '/x'");
    assert_eq!(ExitError::from(err).code, EXIT_REJECTED);
}

#[tokio::test]
async fn wrong_response_is_unexpected() {
    let dir = tempfile::tempdir().unwrap();
    let (client, _server) = serve_once(&dir, Response::Pong);
    assert!(matches!(client.jobs().await, Err(ClientError::Unexpected(_))));
}

#[tokio::test]
async fn jobs_and_status_are_unpacked() {
    let dir = tempfile::tempdir().unwrap();
    let entry = JobEntry {
        key: JobKey::new("acme", "widget", 42),
        record: JobRecord::builder().build(),
    };
    let (client, _server) = serve_once(&dir, Response::Jobs { jobs: vec![entry.clone()] });
    assert_eq!(client.jobs().await.unwrap(), vec![entry]);

    let dir = tempfile::tempdir().unwrap();
    let (client, _server) = serve_once(
        &dir,
        Response::Status { uptime_secs: 61, units: vec!["base".into()], jobs_active: 0 },
    );
    assert_eq!(
        client.status().await.unwrap(),
        DaemonStatus { uptime_secs: 61, units: vec!["base".into()], jobs_active: 0 }
    );
}

#[tokio::test]
async fn shutdown_accepts_shutting_down() {
    let dir = tempfile::tempdir().unwrap();
    let (client, server) = serve_once(&dir, Response::ShuttingDown);
    client.shutdown().await.unwrap();
    assert_eq!(server.await.unwrap(), Request::Shutdown);
}
