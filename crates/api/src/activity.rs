//! Best-effort activity logging.
//!
//! Handlers hand entries to [`ActivityLogger::record`], which never blocks
//! and never fails: when the bounded channel is full or closed the entry is
//! dropped with a warning. A single [`ActivityWriter`] task drains the
//! channel, emits a `tracing` event per entry and appends it to the store.

use std::sync::Arc;

use ink_core::activity::ActivityEntry;
use ink_core::session::Identity;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::middleware::client::ClientInfo;
use crate::store::ActivitySink;

/// Cheaply cloneable sending half of the activity channel.
#[derive(Clone)]
pub struct ActivityLogger {
    tx: mpsc::Sender<ActivityEntry>,
}

impl ActivityLogger {
    /// Create a logger and the receiver its entries arrive on.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ActivityEntry>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Create a logger backed by a spawned [`ActivityWriter`].
    pub fn spawn(
        sink: Arc<dyn ActivitySink>,
        capacity: usize,
    ) -> (Self, tokio::task::JoinHandle<()>) {
        let (logger, rx) = Self::channel(capacity);
        let handle = tokio::spawn(ActivityWriter::new(sink, rx).run());
        (logger, handle)
    }

    /// Queue an entry without waiting.
    pub fn record(&self, entry: ActivityEntry) {
        match self.tx.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                tracing::warn!(action = %entry.action, "Activity channel full, entry dropped");
            }
            Err(TrySendError::Closed(entry)) => {
                tracing::warn!(action = %entry.action, "Activity writer stopped, entry dropped");
            }
        }
    }

    /// Queue an entry attributed to `identity`, stamped with the caller's
    /// client details.
    pub fn record_for(
        &self,
        identity: &Identity,
        client: &ClientInfo,
        action: &str,
        details: serde_json::Value,
    ) {
        self.record(
            ActivityEntry::new(action)
                .with_actor(identity.user_id, identity.name.clone())
                .with_details(details)
                .with_client(client.ip_address.clone(), client.user_agent.clone()),
        );
    }
}

/// Drains the activity channel into an [`ActivitySink`].
pub struct ActivityWriter {
    sink: Arc<dyn ActivitySink>,
    rx: mpsc::Receiver<ActivityEntry>,
}

impl ActivityWriter {
    pub fn new(sink: Arc<dyn ActivitySink>, rx: mpsc::Receiver<ActivityEntry>) -> Self {
        Self { sink, rx }
    }

    /// Run until every [`ActivityLogger`] clone has been dropped.
    pub async fn run(mut self) {
        tracing::debug!("Activity writer started");
        while let Some(entry) = self.rx.recv().await {
            tracing::info!(
                target: "ink_api::activity",
                action = %entry.action,
                actor_id = entry.actor_id,
                ip = entry.ip_address.as_deref(),
                details = %entry.details,
                "Activity"
            );
            if let Err(e) = self.sink.append(&entry).await {
                tracing::error!(error = %e, action = %entry.action, "Failed to persist activity entry");
            }
        }
        tracing::debug!("Activity writer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ink_core::activity::actions;
    use ink_core::types::DbId;
    use ink_db::models::activity::ActivityLog;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<ActivityEntry>>,
        fail: bool,
    }

    #[async_trait]
    impl ActivitySink for RecordingSink {
        async fn append(&self, entry: &ActivityEntry) -> Result<(), sqlx::Error> {
            if self.fail {
                return Err(sqlx::Error::PoolTimedOut);
            }
            self.entries.lock().await.push(entry.clone());
            Ok(())
        }

        async fn recent_for_actor(
            &self,
            _actor_id: DbId,
            _limit: i64,
        ) -> Result<Vec<ActivityLog>, sqlx::Error> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn full_channel_drops_without_blocking() {
        let (logger, mut rx) = ActivityLogger::channel(1);
        logger.record(ActivityEntry::new(actions::LOGIN));
        logger.record(ActivityEntry::new(actions::LOGOUT));

        assert_eq!(rx.try_recv().map(|e| e.action).ok().as_deref(), Some("login"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (logger, rx) = ActivityLogger::channel(4);
        drop(rx);
        logger.record(ActivityEntry::new(actions::LOGIN));
    }

    #[tokio::test]
    async fn writer_persists_until_senders_drop() {
        let sink = Arc::new(RecordingSink::default());
        let (logger, handle) = ActivityLogger::spawn(sink.clone(), 8);

        logger.record(ActivityEntry::new(actions::BOOK_CREATE).with_actor(1, "Ana"));
        logger.record(ActivityEntry::new(actions::BOOK_DELETE).with_actor(1, "Ana"));
        drop(logger);
        handle.await.expect("writer task");

        let entries = sink.entries.lock().await;
        let names: Vec<_> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(names, vec!["book_create", "book_delete"]);
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_writer() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..RecordingSink::default()
        });
        let (logger, handle) = ActivityLogger::spawn(sink, 8);
        logger.record(ActivityEntry::new(actions::LOGIN));
        logger.record(ActivityEntry::new(actions::LOGOUT));
        drop(logger);
        handle.await.expect("writer completes");
    }
}
