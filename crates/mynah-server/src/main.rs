//! mynah-server - REST API server binary.

use std::net::SocketAddr;

use mynah_core::MynahConfig;
use mynah_server::{create_server, create_server_with_auth, AppState, AuthConfig};
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("mynah_server=debug".parse()?),
        )
        .init();

    // Get configuration from environment
    let host = std::env::var("MYNAH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("MYNAH_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|e| format!("MYNAH_PORT must be a valid port number: {}", e))?;

    // A missing backend credential is fatal here
    let config = MynahConfig::load()?;
    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(code = e.code().as_str(), "Startup failed: {}", e);
            return Err(e.into());
        }
    };

    // Create server with or without auth
    let app = match AuthConfig::from_env() {
        Some(auth) => {
            info!("Authentication enabled");
            create_server_with_auth(state, auth)
        }
        None => {
            info!("Authentication disabled");
            create_server(state)
        }
    };

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting mynah-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
