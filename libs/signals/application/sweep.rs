//! Periodic listing of matches still waiting on a signal outcome

use super::tracker::MatchStateTracker;
use crate::infrastructure::shutdown::interruptible_sleep;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Log every match in SIGNAL_SENT. Returns how many there were.
pub fn log_signal_sent(tracker: &MatchStateTracker) -> usize {
    let pending = tracker.signal_sent_matches();
    if pending.is_empty() {
        debug!("[Sweep] No matches waiting on a signal outcome");
        return 0;
    }

    info!("[Sweep] {} match(es) in SIGNAL_SENT:", pending.len());
    for key in &pending {
        info!("[Sweep]   {}", key);
    }
    pending.len()
}

/// Spawn the read-only sweep, ticking every `interval` until shutdown
pub fn spawn_signal_sweep(
    tracker: MatchStateTracker,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            interruptible_sleep(&shutdown, interval).await;
            if !shutdown.load(Ordering::Acquire) {
                break;
            }
            log_signal_sent(&tracker);
        }
        debug!("[Sweep] Stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchKey, MatchPhase};

    #[test]
    fn test_counts_only_signal_sent() {
        let tracker = MatchStateTracker::new();
        assert_eq!(log_signal_sent(&tracker), 0);

        tracker.record_signal(&MatchKey::new("A", "B"), "0 - 0");
        tracker.record_signal(&MatchKey::new("C", "D"), "0 - 0");
        tracker.set_phase(&MatchKey::new("C", "D"), MatchPhase::Green);

        assert_eq!(log_signal_sent(&tracker), 1);
    }

    #[tokio::test]
    async fn test_sweep_stops_on_shutdown() {
        let shutdown = Arc::new(AtomicBool::new(true));
        let task = spawn_signal_sweep(
            MatchStateTracker::new(),
            Duration::from_millis(20),
            Arc::clone(&shutdown),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.store(false, Ordering::Release);

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }
}
