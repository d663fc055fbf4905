//! Periodic purge of expired sessions.
//!
//! Runs `SessionService::cleanup_expired` on a fixed interval until the
//! cancellation token fires.

use crate::config::Config;
use crate::services::session_service::SessionService;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run the cleanup loop. The first sweep happens immediately.
pub async fn run(pool: SqlitePool, config: Arc<Config>, cancel: CancellationToken) {
    let period = Duration::from_secs(config.session_cleanup_interval_seconds.max(1));

    tracing::info!(
        interval_secs = period.as_secs(),
        "Session cleanup job started"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                let service = SessionService::from_config(&pool, &config);
                match service.cleanup_expired().await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged expired sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
