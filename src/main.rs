//! Server binary
//!
//! Binds the HTTP listener, then starts the two process-lifetime background
//! tasks (session sweeper, discovery responder) before serving.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use pc_remote::config::DEFAULT_API_TOKEN;
use pc_remote::{AppState, DiscoveryResponder, ServerConfig};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    if config.api_token == DEFAULT_API_TOKEN {
        tracing::warn!(
            "Using the default API token; set {} before exposing this server",
            pc_remote::config::API_TOKEN_ENV
        );
    }

    let state = AppState::new(config.clone());

    let _sweeper = state
        .sessions
        .spawn_sweep_task(config.session_sweep_interval);

    let discovery_addr: SocketAddr = ([0, 0, 0, 0], config.discovery_port).into();
    match DiscoveryResponder::bind(
        discovery_addr,
        config.bind_addr.port(),
        config.api_token.clone(),
    )
    .await
    {
        Ok(responder) => {
            responder.spawn();
        }
        // The server is still reachable by direct address
        Err(e) => tracing::warn!(error = %e, "Discovery listener failed to start"),
    }

    let app = pc_remote::router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "PC remote server listening");

    axum::serve(listener, app).await
}
