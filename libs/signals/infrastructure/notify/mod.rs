//! Outbound notification delivery
//!
//! `NotificationSink::send` only enqueues. A worker task delivers queued
//! texts one at a time through a `Notifier`, so slow or failing deliveries
//! never hold up record processing. Failures are logged and not retried.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Delivery rejected: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),
}

/// Something that can deliver a chat message
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, text: &str) -> Result<(), NotifyError>;
}

/// Notifier that only writes messages to the log
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        info!("[Notice]\n{}", text);
        Ok(())
    }
}

/// Non-blocking handle for queuing messages
#[derive(Debug, Clone)]
pub struct NotificationSink {
    tx: UnboundedSender<String>,
}

impl NotificationSink {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Queue `text` for delivery. Never waits.
    pub fn send(&self, text: String) {
        if self.tx.send(text).is_err() {
            warn!("Notification worker is gone, dropping message");
        }
    }
}

/// Spawn the delivery worker for `notifier`
pub fn spawn_notification_worker(notifier: Arc<dyn Notifier>) -> (NotificationSink, JoinHandle<()>) {
    let (tx, rx) = unbounded_channel();
    let task = tokio::spawn(run_notification_worker(notifier, rx));
    (NotificationSink::new(tx), task)
}

async fn run_notification_worker(notifier: Arc<dyn Notifier>, mut rx: UnboundedReceiver<String>) {
    info!(notifier = notifier.name(), "Notification worker started");
    let mut delivered = 0u64;
    let mut failed = 0u64;

    while let Some(text) = rx.recv().await {
        match notifier.deliver(&text).await {
            Ok(()) => {
                delivered += 1;
                debug!(notifier = notifier.name(), "Notification delivered");
            }
            Err(e) => {
                failed += 1;
                warn!(notifier = notifier.name(), error = %e, "Failed to deliver notification");
            }
        }
    }

    info!(delivered, failed, "Notification worker drained and stopped");
}
