//! End-to-end tests of the sync controller against a real server.

use crate::common::{start_test_server, TestServer};
use corkboard::client::{ClientState, SyncController, WsConnector};
use corkboard::shared::{AppConfig, NoteDraft, NotePatch};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

fn controller(server: &TestServer) -> SyncController<WsConnector> {
    let config = AppConfig::builder()
        .socket_url(server.ws_url())
        .reconnect_delay(Duration::from_millis(20))
        .build()
        .unwrap();
    let connector = WsConnector::new(config.socket_url.clone());
    SyncController::new(config, connector)
}

async fn eventually<F>(state: &Arc<RwLock<ClientState>>, check: F)
where
    F: Fn(&ClientState) -> bool,
{
    eventually_within(state, 300, check).await
}

async fn eventually_within<F>(state: &Arc<RwLock<ClientState>>, polls: u32, check: F)
where
    F: Fn(&ClientState) -> bool,
{
    for _ in 0..polls {
        if check(&*state.read().await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached after {} polls", polls);
}

#[tokio::test]
async fn test_two_clients_see_each_others_notes() {
    let server = start_test_server().await;
    let mut ana = controller(&server);
    let mut carlos = controller(&server);

    ana.join("Ana").await.unwrap();
    carlos.join("Carlos").await.unwrap();
    eventually(&ana.state(), |s| s.presence.online_users().len() == 2).await;

    ana.create_note(NoteDraft {
        title: Some("X".to_string()),
        ..NoteDraft::default()
    })
    .await
    .unwrap();

    eventually(&carlos.state(), |s| s.notes.len() == 1).await;
    let note = carlos.notes().await.remove(0);
    assert_eq!(note.title, "X");
    assert_eq!(note.updated_by.as_deref(), Some("Ana"));

    carlos.add_comment(&note.id, "Hola").await.unwrap();
    eventually(&ana.state(), |s| {
        s.notes
            .get(&note.id)
            .map(|n| n.comments.len() == 1)
            .unwrap_or(false)
    })
    .await;
}

#[tokio::test]
async fn test_optimistic_edit_converges() {
    let server = start_test_server().await;
    let mut ana = controller(&server);
    let mut carlos = controller(&server);
    ana.join("Ana").await.unwrap();
    carlos.join("Carlos").await.unwrap();

    ana.create_note(NoteDraft::default()).await.unwrap();
    eventually(&carlos.state(), |s| s.notes.len() == 1).await;

    let mut note = carlos.notes().await.remove(0);
    note.content = "edited by Carlos".to_string();
    carlos.edit_note(note.clone()).await.unwrap();

    eventually(&ana.state(), |s| {
        s.notes
            .get(&note.id)
            .map(|n| n.content == "edited by Carlos")
            .unwrap_or(false)
    })
    .await;
    eventually(&carlos.state(), |s| {
        s.notes
            .get(&note.id)
            .and_then(|n| n.updated_by.clone())
            .as_deref()
            == Some("Carlos")
    })
    .await;
}

#[tokio::test]
async fn test_late_joiner_receives_board() {
    let server = start_test_server().await;
    let mut ana = controller(&server);
    ana.join("Ana").await.unwrap();
    for title in ["a", "b", "c"] {
        ana.create_note(NoteDraft {
            title: Some(title.to_string()),
            ..NoteDraft::default()
        })
        .await
        .unwrap();
    }
    eventually(&ana.state(), |s| s.notes.len() == 3).await;

    let mut carlos = controller(&server);
    carlos.join("Carlos").await.unwrap();

    eventually(&carlos.state(), |s| s.notes.len() == 3).await;
    assert!(carlos.is_connected().await);
}

#[tokio::test]
async fn test_stop_leaves_the_board() {
    let server = start_test_server().await;
    let mut ana = controller(&server);
    let mut carlos = controller(&server);
    ana.join("Ana").await.unwrap();
    carlos.join("Carlos").await.unwrap();
    eventually(&ana.state(), |s| s.presence.online_users().len() == 2).await;

    carlos.stop().await;

    assert!(!carlos.is_connected().await);
    eventually(&ana.state(), |s| s.presence.online_users() == ["Ana".to_string()]).await;
}

#[tokio::test]
async fn test_update_burst_converges_on_every_client() {
    let server = start_test_server().await;
    let mut ana = controller(&server);
    let mut carlos = controller(&server);
    ana.join("Ana").await.unwrap();
    carlos.join("Carlos").await.unwrap();

    ana.create_note(NoteDraft::default()).await.unwrap();
    eventually(&ana.state(), |s| s.notes.len() == 1).await;
    let id = ana.notes().await.remove(0).id;

    for i in 0..3000i64 {
        ana.update_note(
            NotePatch::new(&id)
                .with_title(format!("t{}", i))
                .with_timestamp(i + 10),
        )
        .await
        .unwrap();
    }

    let converged = |s: &ClientState| {
        s.notes
            .get(&id)
            .map(|n| n.title == "t2999" && n.timestamp == 3009)
            .unwrap_or(false)
    };
    eventually_within(&ana.state(), 1000, converged).await;
    eventually_within(&carlos.state(), 1000, converged).await;
    assert!(ana.is_connected().await);

    // The connection still carries new intents after the burst.
    carlos.add_comment(&id, "done").await.unwrap();
    eventually(&ana.state(), |s| {
        s.notes
            .get(&id)
            .map(|n| n.comments.len() == 1)
            .unwrap_or(false)
    })
    .await;
}
