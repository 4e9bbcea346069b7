//! Real-time Module
//!
//! This module carries board events between the server and its clients over
//! WebSockets.
//!
//! # Architecture
//!
//! - **`broadcast`** - Fan-out channel shared by all connections
//! - **`connection`** - Per-connection state and lifecycle phase
//! - **`gateway`** - WebSocket upgrade, connection loop and intent dispatch
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── broadcast.rs  - Event broadcasting utilities
//! ├── connection.rs - Connection state
//! └── gateway.rs    - WebSocket handler
//! ```

/// Event broadcasting utilities
pub mod broadcast;

/// Per-connection state
pub mod connection;

/// WebSocket handler
pub mod gateway;

// Re-export commonly used types and functions
pub use broadcast::{broadcast_event, RealtimeEventBroadcast, DEFAULT_BROADCAST_CAPACITY};
pub use connection::{BoardConnection, ConnectionPhase};
pub use gateway::handle_socket_upgrade;
