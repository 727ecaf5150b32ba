//! Periodic removal of idle session records.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::session::SessionStore;

/// How often the purge runs.
const PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Run the purge loop until `cancel` is triggered.
pub async fn run(sessions: Arc<SessionStore>, cancel: CancellationToken) {
    run_every(sessions, cancel, PURGE_INTERVAL).await;
}

async fn run_every(sessions: Arc<SessionStore>, cancel: CancellationToken, period: Duration) {
    tracing::info!(interval_secs = period.as_secs(), "Session purge job started");

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session purge job stopping");
                break;
            }
            _ = interval.tick() => {
                let removed = sessions.purge_idle(Utc::now()).await;
                if removed > 0 {
                    tracing::info!(removed, "Session purge: dropped idle sessions");
                } else {
                    tracing::debug!("Session purge: nothing to drop");
                }
            }
        }
    }
}
