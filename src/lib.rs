//! Corkboard - Main Library
//!
//! Corkboard is a real-time collaborative note board. Users join with a
//! display name and create, move, edit, delete and comment on notes; every
//! change is relayed to all connected users and the board survives server
//! restarts.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and clients
//!   - Notes, comments, create/update payloads
//!   - The WebSocket event protocol
//!   - Error types and client configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Note repository and presence registry
//!   - Debounced JSON snapshots
//!   - Axum WebSocket gateway and health endpoint
//!
//! - **`client`** - Client-side synchronization
//!   - Local note store with last-writer-wins merge
//!   - Reconnecting sync controller and intent API
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the `backend` module and the
//!   `corkboard-server` binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use corkboard::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let addr = config.bind_addr();
//! let (app, _state) = create_app(config).await;
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client-Side
//!
//! ```rust,no_run
//! use corkboard::client::{Config, SyncController, WsConnector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?.into_app();
//! let connector = WsConnector::new(config.socket_url.clone());
//! let mut controller = SyncController::new(config, connector);
//! controller.join("Ana").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Server**: a `Mutex` serializes note mutations; `broadcast::Sender`
//!   fans events out to connections
//! - **Client**: local state lives behind `Arc<RwLock<ClientState>>`, shared
//!   between the controller's task and the caller

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Client-side synchronization
pub mod client;
