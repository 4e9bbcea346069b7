//! Backend Module
//!
//! This module contains all server-side code for the board. It provides an
//! Axum server that holds the authoritative set of notes, persists it to a
//! JSON snapshot, tracks who is online, and relays every change to all
//! connected clients over WebSockets.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`board`** - Note repository, presence registry, snapshotter, shared state
//! - **`realtime`** - WebSocket gateway and event broadcasting
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── board/          - Board state
//! ├── realtime/       - WebSocket gateway
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! - `Mutex<NoteRepository>` is the single writer for note mutations
//! - `broadcast::Sender` fans events out to every connection task
//! - The snapshotter is a single task fed over an `mpsc` channel

/// Board state
pub mod board;

/// Real-time WebSocket gateway
pub mod realtime;

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use board::BoardState;
pub use error::BackendError;
pub use realtime::{broadcast_event, RealtimeEventBroadcast};
pub use server::{create_app, ServerConfig};
