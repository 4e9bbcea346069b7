//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the board server and its clients. These types are used for serialization
//! and communication over the realtime WebSocket protocol and for the
//! persisted board snapshot.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code:
//!
//! - **`note`** - `Note`, `Comment` and the intent payloads that create or patch them
//! - **`event`** - The client → server and server → client event enums
//! - **`error`** - Errors that can occur on either side
//! - **`config`** - Client connection configuration and its builder

/// Note and comment data structures
pub mod note;

/// Realtime event protocol
pub mod event;

/// Shared error types
pub mod error;

/// Client connection configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use note::{now_millis, Comment, Note, NoteDraft, NotePatch};
pub use event::{ClientEvent, PresenceUser, ServerEvent};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
