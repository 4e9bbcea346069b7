//! Realtime gateway tests over real WebSocket connections.

use crate::common::{start_test_server, WsClient};
use corkboard::shared::{ClientEvent, NoteDraft, NotePatch, PresenceUser, ServerEvent};
use pretty_assertions::assert_eq;
use std::time::Duration;

const QUIET: Duration = Duration::from_millis(300);

fn draft(title: &str) -> ClientEvent {
    ClientEvent::NoteCreate(NoteDraft {
        title: Some(title.to_string()),
        ..NoteDraft::default()
    })
}

fn users(names: &[&str]) -> Vec<PresenceUser> {
    names
        .iter()
        .map(|n| PresenceUser {
            name: n.to_string(),
        })
        .collect()
}

#[tokio::test]
async fn test_presence_lists_users_in_join_order() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let _carlos = WsClient::joined(&server, "Carlos").await;

    let event = ana
        .recv_until(|e| matches!(e, ServerEvent::PresenceUsers { users } if users.len() == 2))
        .await;
    assert_eq!(
        event,
        ServerEvent::PresenceUsers {
            users: users(&["Ana", "Carlos"])
        }
    );
}

#[tokio::test]
async fn test_create_is_broadcast_to_everyone() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let mut carlos = WsClient::joined(&server, "Carlos").await;

    ana.send(&draft("X")).await;

    let for_ana = ana
        .recv_until(|e| matches!(e, ServerEvent::NoteCreated(_)))
        .await;
    let for_carlos = carlos
        .recv_until(|e| matches!(e, ServerEvent::NoteCreated(_)))
        .await;
    assert_eq!(for_ana, for_carlos);

    let note = crate::assert_event!(for_ana, ServerEvent::NoteCreated(note) => note);
    assert_eq!(note.title, "X");
    assert_eq!(note.updated_by.as_deref(), Some("Ana"));
    assert!(note.comments.is_empty());
    assert!(!note.id.is_empty());
}

#[tokio::test]
async fn test_board_init_replies_only_to_sender() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let mut carlos = WsClient::joined(&server, "Carlos").await;
    ana.send(&draft("X")).await;
    ana.recv_until(|e| matches!(e, ServerEvent::NoteCreated(_)))
        .await;
    carlos
        .recv_until(|e| matches!(e, ServerEvent::NoteCreated(_)))
        .await;

    ana.send(&ClientEvent::BoardInit).await;

    let notes = crate::assert_event!(ana.recv().await, ServerEvent::BoardData { notes } => notes);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "X");
    carlos.expect_silence(QUIET).await;
}

#[tokio::test]
async fn test_update_of_missing_note_is_silently_dropped() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;

    ana.send(&ClientEvent::NoteUpdate(
        NotePatch::new("ghost").with_title("Y"),
    ))
    .await;
    ana.send(&ClientEvent::BoardInit).await;

    // Intents from one connection are handled in order, so the next event
    // is the reply to board:init and nothing was emitted for the update.
    assert_eq!(ana.recv().await, ServerEvent::BoardData { notes: vec![] });
    assert_eq!(server.state.board.dropped_intents(), 1);
}

#[tokio::test]
async fn test_update_merges_fields_and_trusts_timestamp() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let mut carlos = WsClient::joined(&server, "Carlos").await;
    ana.send(&draft("X")).await;
    let created = crate::assert_event!(
        carlos.recv_until(|e| matches!(e, ServerEvent::NoteCreated(_))).await,
        ServerEvent::NoteCreated(note) => note
    );

    carlos
        .send(&ClientEvent::NoteUpdate(
            NotePatch::new(&created.id)
                .with_position(120.0, 80.0)
                .with_timestamp(5),
        ))
        .await;

    let updated = crate::assert_event!(
        ana.recv_until(|e| matches!(e, ServerEvent::NoteUpdated(_))).await,
        ServerEvent::NoteUpdated(note) => note
    );
    assert_eq!(updated.title, "X");
    assert_eq!((updated.x, updated.y), (120.0, 80.0));
    assert_eq!(updated.timestamp, 5);
    assert_eq!(updated.updated_by.as_deref(), Some("Carlos"));
}

#[tokio::test]
async fn test_editing_marker_can_be_cleared_with_null() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    ana.send(&draft("X")).await;
    let created = crate::assert_event!(
        ana.recv_until(|e| matches!(e, ServerEvent::NoteCreated(_))).await,
        ServerEvent::NoteCreated(note) => note
    );

    ana.send_raw(&format!(
        r#"{{"event":"note:update","data":{{"id":"{}","editingBy":"Ana","editingAt":7}}}}"#,
        created.id
    ))
    .await;
    let marked = crate::assert_event!(ana.recv().await, ServerEvent::NoteUpdated(note) => note);
    assert_eq!(marked.editing_by.as_deref(), Some("Ana"));
    assert_eq!(marked.editing_at, Some(7));

    ana.send_raw(&format!(
        r#"{{"event":"note:update","data":{{"id":"{}","editingBy":null,"editingAt":null}}}}"#,
        created.id
    ))
    .await;
    let cleared = crate::assert_event!(ana.recv().await, ServerEvent::NoteUpdated(note) => note);
    assert_eq!(cleared.editing_by, None);
    assert_eq!(cleared.editing_at, None);
}

#[tokio::test]
async fn test_delete_of_missing_note_is_still_broadcast() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let mut carlos = WsClient::joined(&server, "Carlos").await;

    ana.send(&ClientEvent::NoteDelete {
        id: "ghost".to_string(),
    })
    .await;

    let expected = ServerEvent::NoteDeleted {
        id: "ghost".to_string(),
    };
    assert_eq!(
        ana.recv_until(|e| matches!(e, ServerEvent::NoteDeleted { .. }))
            .await,
        expected
    );
    assert_eq!(
        carlos
            .recv_until(|e| matches!(e, ServerEvent::NoteDeleted { .. }))
            .await,
        expected
    );
}

#[tokio::test]
async fn test_comment_is_broadcast_with_author() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let mut carlos = WsClient::joined(&server, "Carlos").await;
    ana.send(&draft("X")).await;
    let created = crate::assert_event!(
        carlos.recv_until(|e| matches!(e, ServerEvent::NoteCreated(_))).await,
        ServerEvent::NoteCreated(note) => note
    );

    carlos
        .send(&ClientEvent::NoteComment {
            note_id: created.id.clone(),
            text: "Hola".to_string(),
        })
        .await;

    let (note_id, comment) = crate::assert_event!(
        ana.recv_until(|e| matches!(e, ServerEvent::NoteCommented { .. })).await,
        ServerEvent::NoteCommented { note_id, comment } => (note_id, comment)
    );
    assert_eq!(note_id, created.id);
    assert_eq!(comment.user, "Carlos");
    assert_eq!(comment.text, "Hola");
}

#[tokio::test]
async fn test_anonymous_connection_authors_as_unknown() {
    let server = start_test_server().await;
    let mut anon = WsClient::connect(&server).await;

    anon.send(&draft("X")).await;

    let note = crate::assert_event!(anon.recv().await, ServerEvent::NoteCreated(note) => note);
    assert_eq!(note.updated_by.as_deref(), Some("unknown"));
}

#[tokio::test]
async fn test_malformed_payload_errors_only_the_sender() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let mut carlos = WsClient::joined(&server, "Carlos").await;
    ana.recv_until(|e| matches!(e, ServerEvent::PresenceUsers { users } if users.len() == 2))
        .await;

    carlos
        .send_raw(r#"{"event":"note:create","data":{"x":"left"}}"#)
        .await;

    let message = crate::assert_event!(
        carlos.recv().await,
        ServerEvent::ServerError { message } => message
    );
    crate::assert_contains!(message, "create");
    ana.expect_silence(QUIET).await;
    assert_eq!(server.state.board.note_count().await, 0);
}

#[tokio::test]
async fn test_unknown_event_is_ignored() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;

    ana.send_raw(r#"{"event":"cursor:move","data":{"x":1}}"#).await;
    ana.send(&ClientEvent::BoardInit).await;

    assert_eq!(ana.recv().await, ServerEvent::BoardData { notes: vec![] });
}

#[tokio::test]
async fn test_disconnect_updates_presence_for_remaining() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let carlos = WsClient::joined(&server, "Carlos").await;
    ana.recv_until(|e| matches!(e, ServerEvent::PresenceUsers { users } if users.len() == 2))
        .await;

    carlos.close().await;

    let event = ana
        .recv_until(|e| matches!(e, ServerEvent::PresenceUsers { .. }))
        .await;
    assert_eq!(
        event,
        ServerEvent::PresenceUsers {
            users: users(&["Ana"])
        }
    );
}

#[tokio::test]
async fn test_intents_from_one_connection_apply_in_order() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    let mut carlos = WsClient::joined(&server, "Carlos").await;

    for i in 0..10 {
        ana.send(&draft(&format!("note {}", i))).await;
    }

    let mut titles = Vec::new();
    while titles.len() < 10 {
        if let ServerEvent::NoteCreated(note) = carlos.recv().await {
            titles.push(note.title);
        }
    }
    let expected: Vec<String> = (0..10).map(|i| format!("note {}", i)).collect();
    assert_eq!(titles, expected);
}

#[tokio::test]
async fn test_payloadless_intents_accept_empty_data() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;

    ana.send_raw(r#"{"event":"note:create"}"#).await;
    let note = crate::assert_event!(ana.recv().await, ServerEvent::NoteCreated(note) => note);
    assert_eq!(note.title, "");
    assert_eq!((note.x, note.y), (0.0, 0.0));

    for frame in [
        r#"{"event":"board:init","data":{}}"#,
        r#"{"event":"board:init","data":null}"#,
        r#"{"event":"board:init"}"#,
    ] {
        ana.send_raw(frame).await;
        let notes = crate::assert_event!(ana.recv().await, ServerEvent::BoardData { notes } => notes);
        assert_eq!(notes, vec![note.clone()]);
    }
}

#[tokio::test]
async fn test_fractional_timestamp_is_accepted() {
    let server = start_test_server().await;
    let mut ana = WsClient::joined(&server, "Ana").await;
    ana.send(&draft("X")).await;
    let created = crate::assert_event!(ana.recv().await, ServerEvent::NoteCreated(note) => note);

    ana.send_raw(&format!(
        r#"{{"event":"note:update","data":{{"id":"{}","timestamp":42.7}}}}"#,
        created.id
    ))
    .await;

    let updated = crate::assert_event!(ana.recv().await, ServerEvent::NoteUpdated(note) => note);
    assert_eq!(updated.timestamp, 42);
}
