//! Notification port and its queue-backed implementation.

use apalis::prelude::*;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

/// Outbound notification port.
///
/// Delivery is asynchronous and best-effort; callers must treat a failed
/// send as non-fatal.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Queue a (recipient, subject, body) message for delivery.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Notifier backed by the apalis Postgres job queue.
///
/// Pushing only enqueues; the `jobs work` process picks messages up and
/// delivers them.
pub struct QueueNotifier {
    storage: PostgresStorage<EmailJob>,
}

impl QueueNotifier {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Notifier for QueueNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let mut storage = self.storage.clone();
        storage
            .push(EmailJob::new(to, subject, body))
            .await
            .map_err(|e| AppError::internal(format!("Failed to queue email: {}", e)))?;

        tracing::debug!(to = %to, subject = %subject, "Queued email");
        Ok(())
    }
}
