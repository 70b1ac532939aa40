//! Graceful shutdown management

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::sleep;
use tracing::info;

/// Shared running flag for the feed, processor and sweep tasks
#[derive(Clone)]
pub struct ShutdownManager {
    flag: Arc<AtomicBool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Spawn a Ctrl+C signal handler that triggers shutdown
    pub fn spawn_signal_handler(&self) {
        let flag = Arc::clone(&self.flag);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("");
                info!("Received shutdown signal (Ctrl+C)");
                info!("Shutting down gracefully...");
                flag.store(false, Ordering::Release);
            }
        });
    }

    /// Stop every task watching this flag
    pub fn trigger(&self) {
        self.flag.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clone of the flag for tasks that don't hold the manager
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep in short steps, returning as soon as `flag` turns false
pub async fn interruptible_sleep(flag: &AtomicBool, duration: Duration) {
    let check_interval = Duration::from_millis(50);
    let mut elapsed = Duration::ZERO;

    while elapsed < duration && flag.load(Ordering::Acquire) {
        sleep(check_interval).await;
        elapsed += check_interval;
    }
}
