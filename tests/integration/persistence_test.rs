//! Snapshot persistence across server restarts.

use crate::common::{start_test_server, start_test_server_with_data, WsClient};
use corkboard::backend::board::snapshot::read_snapshot;
use corkboard::shared::{ClientEvent, NoteDraft, ServerEvent};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test]
async fn test_burst_of_changes_is_saved_once_with_latest_state() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;

    for i in 0..5 {
        ana.send(&ClientEvent::NoteCreate(NoteDraft {
            title: Some(format!("note {}", i)),
            ..NoteDraft::default()
        }))
        .await;
    }
    for _ in 0..5 {
        ana.recv_until(|e| matches!(e, ServerEvent::NoteCreated(_)))
            .await;
    }

    tokio::time::sleep(Duration::from_millis(400)).await;

    let stats = server.state.board.snapshotter().stats();
    assert_eq!(stats.failures(), 0);
    assert!(stats.writes() >= 1 && stats.writes() < 5);

    let snapshot = read_snapshot(server.data_path()).await.unwrap().unwrap();
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.notes.len(), 5);
}

#[tokio::test]
async fn test_board_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let data_path = dir.path().join("board.json");

    let first = start_test_server_with_data(data_path.clone()).await;
    let mut ana = WsClient::joined(&first, "Ana").await;
    ana.send(&ClientEvent::NoteCreate(NoteDraft {
        title: Some("keep me".to_string()),
        ..NoteDraft::default()
    }))
    .await;
    let created = crate::assert_event!(
        ana.recv_until(|e| matches!(e, ServerEvent::NoteCreated(_))).await,
        ServerEvent::NoteCreated(note) => note
    );
    ana.send(&ClientEvent::NoteComment {
        note_id: created.id.clone(),
        text: "and me".to_string(),
    })
    .await;
    ana.recv_until(|e| matches!(e, ServerEvent::NoteCommented { .. }))
        .await;
    first.state.board.snapshotter().flush().await;

    let second = start_test_server_with_data(data_path).await;
    let mut carlos = WsClient::joined(&second, "Carlos").await;
    carlos.send(&ClientEvent::BoardInit).await;

    let notes = crate::assert_event!(carlos.recv().await, ServerEvent::BoardData { notes } => notes);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, created.id);
    assert_eq!(notes[0].title, "keep me");
    assert_eq!(notes[0].comments.len(), 1);
    assert_eq!(notes[0].comments[0].user, "Ana");
}

#[tokio::test]
async fn test_missing_note_updates_do_not_write() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;

    ana.send(&ClientEvent::NoteComment {
        note_id: "ghost".to_string(),
        text: "hi".to_string(),
    })
    .await;
    ana.send(&ClientEvent::BoardInit).await;
    ana.recv().await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.state.board.snapshotter().stats().writes(), 0);
    assert!(!server.data_path().exists());
}
