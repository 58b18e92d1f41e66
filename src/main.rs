//! Arena Game Client - input and movement core
//!
//! This is the entry point for the client runtime. It handles:
//! - The UDP session with the game server
//! - The per-frame flag processing loop
//! - Routing of inbound server packets into the world

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_game_client::app::ClientState;
use arena_game_client::config::Config;
use arena_game_client::net::listener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Arena Game Client");
    info!("Server address: {}", config.server_addr);

    // Bind the socket and wire up the session
    let (state, session) = ClientState::connect(config).await?;

    // Spawn the per-frame session loop
    tokio::spawn(session.run());

    // Spawn the inbound packet listener
    tokio::spawn(listener::run(
        state.socket.clone(),
        state.session.event_tx.clone(),
    ));

    // The windowing toolkit delivers key edges through the session handle;
    // this core binary parks until shutdown.
    shutdown_signal().await;

    info!("Client shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
