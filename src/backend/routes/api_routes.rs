/**
 * API Route Handlers
 *
 * This module defines the small JSON surface next to the WebSocket:
 *
 * - `GET /health` - Liveness plus a few board counters
 * - `GET /` - Status message when no frontend build is being served
 */
use crate::backend::board::BoardState;
use crate::backend::server::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub notes: usize,
    pub users: usize,
    /// Updates and comments dropped because their note did not exist
    pub dropped_intents: u64,
    pub snapshot_writes: u64,
    pub snapshot_failures: u64,
}

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/health", get(handle_health))
}

pub async fn handle_health(State(board): State<BoardState>) -> Json<HealthResponse> {
    let stats = board.snapshotter().stats();
    Json(HealthResponse {
        status: "ok",
        notes: board.note_count().await,
        users: board.user_count().await,
        dropped_intents: board.dropped_intents(),
        snapshot_writes: stats.writes(),
        snapshot_failures: stats.failures(),
    })
}

/// `GET /` when there is no frontend to serve
pub async fn handle_backend_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Backend running" }))
}
