//! Main entry point for the admin session service.
//!
//! Initializes tracing, loads configuration, opens the database, seeds the
//! bootstrap administrator, starts the session cleanup job and serves the
//! HTTP API until Ctrl-C.

use admin_session_service::config::Config;
use admin_session_service::database::Database;
use admin_session_service::services::admin_service::AdminService;
use admin_session_service::services::session_cleanup;
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(Config::from_env()?);
    let db = Database::new(&config).await?;
    let pool = db.pool().clone();

    if let Some(bootstrap) = &config.bootstrap_admin {
        AdminService::new(&pool, config.bcrypt_cost)
            .ensure_bootstrap_admin(bootstrap)
            .await
            .context("Failed to seed bootstrap administrator")?;
    }

    let cancel = CancellationToken::new();
    let cleanup = tokio::spawn(session_cleanup::run(
        pool.clone(),
        config.clone(),
        cancel.clone(),
    ));

    let app = admin_session_service::app(pool, config.clone());

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting admin session service on port {}", config.server_port);

    let shutdown = cancel.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
        shutdown.cancel();
    })
    .await
    .context("Server error")?;

    cancel.cancel();
    if let Err(e) = cleanup.await {
        tracing::error!(error = %e, "Session cleanup task panicked");
    }
    db.close().await;

    Ok(())
}
