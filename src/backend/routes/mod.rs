//! Routes Module
//!
//! This module configures the HTTP routes of the board server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Router assembly (WebSocket, API, frontend)
//! └── api_routes.rs - Health and status handlers
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
