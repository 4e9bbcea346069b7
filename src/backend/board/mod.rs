//! Board Module
//!
//! This module contains the server-side state of the note board:
//!
//! - **`repository`** - Authoritative in-memory note set
//! - **`presence`** - Connection → display name registry
//! - **`snapshot`** - Debounced JSON persistence and startup restore
//! - **`state`** - `BoardState`, which applies intents, persists and broadcasts
//!
//! # Module Structure
//!
//! ```text
//! board/
//! ├── mod.rs        - Module exports and documentation
//! ├── repository.rs - Note repository
//! ├── presence.rs   - Presence registry
//! ├── snapshot.rs   - Persistence snapshotter
//! └── state.rs      - Shared board state
//! ```

/// Note repository
pub mod repository;

/// Session/presence registry
pub mod presence;

/// Persistence snapshotter
pub mod snapshot;

/// Shared board state
pub mod state;

pub use presence::{ConnectionId, PresenceRegistry};
pub use repository::NoteRepository;
pub use snapshot::{load_persisted_state, BoardSnapshot, Snapshotter};
pub use state::BoardState;
