/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Routes
 *
 * - `GET /ws` - Board WebSocket
 * - `GET /health` - Health and counters
 * - Frontend: if `<frontend_dist>/index.html` exists, files are served from
 *   that directory and any other path falls back to `index.html`.
 *   Otherwise `GET /` returns a status message and unknown paths are 404.
 */
use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::routes::api_routes::{configure_api_routes, handle_backend_status};
use crate::backend::server::state::AppState;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws", get(handle_socket_upgrade));

    // Add API routes
    let router = configure_api_routes(router);

    // Frontend, or a status page when none is built
    let router = if app_state.config.has_frontend() {
        let dist = &app_state.config.frontend_dist;
        tracing::info!("Serving frontend from {}", dist.display());
        router.fallback_service(
            ServeDir::new(dist).fallback(ServeFile::new(app_state.config.index_file())),
        )
    } else {
        router
            .route("/", get(handle_backend_status))
            .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
