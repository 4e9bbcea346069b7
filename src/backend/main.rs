/**
 * Corkboard Server Entry Point
 *
 * This is the main entry point for the board server. It restores the
 * persisted board, serves the WebSocket gateway, and flushes any pending
 * snapshot when stopped with Ctrl-C.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    // Initialize tracing with INFO level by default
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = corkboard::backend::server::ServerConfig::load()?;
    let addr = config.bind_addr();

    // Create the Axum app
    let (app, state) = corkboard::backend::server::create_app(config).await;

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Board server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, flushing pending snapshot");
    state.board.snapshotter().flush().await;

    Ok(())
}

#[cfg(feature = "ssr")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin corkboard-server --features ssr");
    std::process::exit(1);
}
