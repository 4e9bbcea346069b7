/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the board server:
 * restoring the persisted board, spawning the snapshotter, and building
 * the router.
 *
 * # Initialization Process
 *
 * 1. Load the snapshot at `data_path` (missing or unreadable = empty board)
 * 2. Spawn the debounced snapshot writer
 * 3. Create the shared board state and broadcast channel
 * 4. Create and configure the router
 */
use crate::backend::board::{load_persisted_state, BoardState, Snapshotter};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use axum::Router;

/// Build the application state from configuration
///
/// Must be called from within a Tokio runtime (the snapshot writer is
/// spawned here).
pub async fn build_state(config: ServerConfig) -> AppState {
    tracing::info!("Initializing board server");

    // Step 1: Restore the board
    let notes = load_persisted_state(&config.data_path).await;

    // Step 2: Snapshot writer
    let snapshotter = Snapshotter::spawn(&config.data_path, config.persist_debounce());

    // Step 3: Shared board state
    let board = BoardState::new(notes, snapshotter, config.broadcast_capacity);

    AppState::new(board, config)
}

/// Create and configure the Axum application
///
/// Returns the router together with the state it serves, so the caller can
/// flush pending snapshots on shutdown.
pub async fn create_app(config: ServerConfig) -> (Router<()>, AppState) {
    let state = build_state(config).await;
    let router = create_router(state.clone());
    (router, state)
}
