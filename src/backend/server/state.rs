/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The shared board (notes, presence, snapshotter, broadcast channel)
 * - The server configuration it was built from
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`. This follows
 * Axum's recommended pattern for state management.
 *
 * # Example
 *
 * ```rust,no_run
 * use corkboard::backend::board::BoardState;
 * use axum::extract::State;
 *
 * async fn handler(State(board): State<BoardState>) {
 *     let notes = board.note_count().await;
 *     // ...
 * }
 * ```
 */
use crate::backend::board::BoardState;
use crate::backend::server::config::ServerConfig;
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared board state
    pub board: BoardState,
    /// Configuration the server was started with
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(board: BoardState, config: ServerConfig) -> Self {
        Self {
            board,
            config: Arc::new(config),
        }
    }
}

/// Allow handlers to extract `BoardState` from `AppState`
impl FromRef<AppState> for BoardState {
    fn from_ref(state: &AppState) -> Self {
        state.board.clone()
    }
}

/// Allow handlers to extract the configuration from `AppState`
impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
