//! HTTP surface next to the socket endpoint.

use crate::common::{start_test_server, WsClient};
use corkboard::shared::{ClientEvent, NoteDraft, ServerEvent};
use serde_json::Value;

#[tokio::test]
async fn test_root_reports_backend_running_without_frontend() {
    let server = start_test_server().await;

    let response = reqwest::get(server.http_url("/")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "Backend running");
}

#[tokio::test]
async fn test_health_reflects_board_activity() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    ana.send(&ClientEvent::NoteCreate(NoteDraft::default())).await;
    ana.recv_until(|e| matches!(e, ServerEvent::NoteCreated(_)))
        .await;

    let body: Value = reqwest::get(server.http_url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["notes"], 1);
    assert_eq!(body["users"], 1);
    assert_eq!(body["droppedIntents"], 0);
}

#[tokio::test]
async fn test_unknown_path_is_not_found_without_frontend() {
    let server = start_test_server().await;

    let response = reqwest::get(server.http_url("/missing")).await.unwrap();
    assert_eq!(response.status(), 404);
}
