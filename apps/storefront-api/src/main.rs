//! # Storefront API
//!
//! HTTP server entry point.
//!
//! ```text
//! load ApiConfig ──► open SQLite + migrate ──► optional demo seed ──► serve :8080
//!                                                                       │
//!                                                     Ctrl+C / SIGTERM ─┘ graceful shutdown
//! ```

use std::net::SocketAddr;

use storefront_api::config::ApiConfig;
use storefront_api::services::auth_service::seed_demo;
use storefront_api::{build_router, init_tracing, AppState};
use storefront_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Storefront API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path,
        "Configuration loaded"
    );

    // Open database (migrations run on connect)
    let db_config = DbConfig::new(&config.database_path).max_connections(config.db_max_connections);
    let db = Database::new(db_config).await?;
    info!("Database ready");

    if config.seed_demo_data {
        let report = seed_demo(&db).await?;
        info!(users = report.users, products = report.products, "Demo data checked");
    }

    let app = build_router(AppState::new(db.clone(), &config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
