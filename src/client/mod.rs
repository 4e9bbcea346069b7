//! Board Client
//!
//! Everything a program needs to take part in a board as a client: a local
//! replica of the notes with last-writer-wins reconciliation, session and
//! presence state, and a controller that keeps them in sync with the server
//! over a reconnecting WebSocket.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs        - Module exports and documentation
//! ├── config.rs     - Client configuration (env overrides)
//! ├── controller.rs - SyncController and the intent API
//! ├── error.rs      - ClientError
//! ├── state.rs      - Session, presence and combined client state
//! ├── store.rs      - NoteStore
//! └── transport.rs  - Connector trait and WebSocket connector
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod store;
pub mod transport;

pub use config::Config;
pub use controller::SyncController;
pub use error::ClientError;
pub use state::{ClientState, PresenceState, SessionState};
pub use store::NoteStore;
pub use transport::{Connection, Connector, RemoteEnd, WsConnector};
