//! Multi-room TCP chat server - Entry Point
//!
//! Starts the lobby actor and the TCP listener, accepting connections.

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use linechat::{handle_connection, Config, Lobby};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=linechat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linechat=info")),
        )
        .init();

    let config = Config::from_env();
    let outbound_buffer = config.outbound_buffer;

    // Start TCP listener
    let listener = TcpListener::bind(&config.addr).await?;
    info!("chat server listening on {}", config.addr);

    // Create the lobby actor and start it
    let (lobby, events) = Lobby::new(config);
    tokio::spawn(lobby.run());

    info!("lobby actor started");

    // Connection accept loop
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("new connection from {}", addr);
                let events = events.clone();

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, events, outbound_buffer).await {
                        error!("connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("failed to accept connection: {}", e);
            }
        }
    }
}
