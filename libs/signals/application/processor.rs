//! Signal Processor
//!
//! Owns the classifier and consumes feed batches one at a time. Each record
//! is fully classified, and its notices queued, before the next one is read.

use super::classifier::EventClassifier;
use crate::domain::{GlobalTally, MatchUpdate};
use crate::infrastructure::{Heartbeat, NotificationSink};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long the loop waits for a batch before re-checking shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("batch is not a JSON array (got {0})")]
    NotAnArray(&'static str),

    #[error("batch is empty")]
    Empty,
}

/// Running counters for the heartbeat and the final report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    pub batches: u64,
    pub rejected_batches: u64,
    pub records: u64,
    pub skipped_records: u64,
    pub notices: u64,
}

/// What the processor leaves behind when it stops
#[derive(Debug, Clone)]
pub struct ProcessorReport {
    pub stats: ProcessorStats,
    pub tally: GlobalTally,
    pub tracked_matches: usize,
    pub leagues: usize,
}

impl fmt::Display for ProcessorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Batches: {} ({} rejected) | Records: {} ({} skipped) | Notices: {} | \
             Greens: {} 1st / {} 2nd | Reds: {} | Matches: {} | Leagues: {}",
            self.stats.batches,
            self.stats.rejected_batches,
            self.stats.records,
            self.stats.skipped_records,
            self.stats.notices,
            self.tally.first_half_greens,
            self.tally.second_half_greens,
            self.tally.red_count,
            self.tracked_matches,
            self.leagues
        )
    }
}

pub struct SignalProcessor {
    classifier: EventClassifier,
    sink: NotificationSink,
    heartbeat: Heartbeat,
    stats: ProcessorStats,
}

impl SignalProcessor {
    pub fn new(classifier: EventClassifier, sink: NotificationSink, heartbeat_interval_secs: u64) -> Self {
        Self {
            classifier,
            sink,
            heartbeat: Heartbeat::new(heartbeat_interval_secs),
            stats: ProcessorStats::default(),
        }
    }

    pub fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }

    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    /// Classify every record of one batch and queue the resulting notices.
    ///
    /// Returns the number of notices queued. Elements that don't deserialize
    /// as a match update are logged and skipped.
    pub fn process_batch(&mut self, batch: &Value) -> Result<usize, BatchError> {
        let records = batch
            .as_array()
            .ok_or_else(|| BatchError::NotAnArray(json_kind(batch)))?;
        if records.is_empty() {
            return Err(BatchError::Empty);
        }

        self.stats.batches += 1;
        let mut queued = 0usize;

        for (index, raw) in records.iter().enumerate() {
            let update = match MatchUpdate::deserialize(raw) {
                Ok(update) => update,
                Err(e) => {
                    self.stats.skipped_records += 1;
                    warn!(index = index, error = %e, "[Processor] Skipping malformed record");
                    continue;
                }
            };
            self.stats.records += 1;

            for notice in self.classifier.classify(&update) {
                debug!(kind = notice.kind(), "[Processor] Queuing notice");
                self.sink.send(notice.render());
                queued += 1;
            }
        }

        self.stats.notices += queued as u64;
        Ok(queued)
    }

    fn handle_batch(&mut self, batch: &Value) {
        match self.process_batch(batch) {
            Ok(_) => {}
            Err(BatchError::Empty) => {
                self.stats.rejected_batches += 1;
                debug!("[Processor] Skipping empty batch");
            }
            Err(e) => {
                self.stats.rejected_batches += 1;
                warn!("[Processor] Skipping batch: {}", e);
            }
        }
    }

    /// Consume batches until shutdown or until every sender is gone.
    ///
    /// Batches already buffered when shutdown is observed are still
    /// processed. Dropping the processor afterwards releases the notification
    /// sink and the store handle so their workers can drain.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Value>, shutdown: Arc<AtomicBool>) -> ProcessorReport {
        info!("[Processor] Started");

        while shutdown.load(Ordering::Acquire) {
            match tokio::time::timeout(POLL_INTERVAL, rx.recv()).await {
                Ok(Some(batch)) => self.handle_batch(&batch),
                Ok(None) => {
                    info!("[Processor] Feed channel closed");
                    break;
                }
                Err(_) => {}
            }

            if self.heartbeat.should_beat() {
                self.log_status();
                self.heartbeat.beat();
            }
        }

        rx.close();
        while let Ok(batch) = rx.try_recv() {
            self.handle_batch(&batch);
        }

        self.log_status();
        info!("[Processor] Stopped");
        self.report()
    }

    pub fn report(&self) -> ProcessorReport {
        ProcessorReport {
            stats: self.stats,
            tally: self.classifier.tally(),
            tracked_matches: self.classifier.tracker().len(),
            leagues: self.classifier.aggregator().leagues().len(),
        }
    }

    fn log_status(&self) {
        let tally = self.classifier.tally();
        info!(
            batches = self.stats.batches,
            rejected_batches = self.stats.rejected_batches,
            records = self.stats.records,
            skipped_records = self.stats.skipped_records,
            notices = self.stats.notices,
            tracked_matches = self.classifier.tracker().len(),
            goal_events = self.classifier.ledger().len(),
            greens_1st = tally.first_half_greens,
            greens_2nd = tally.second_half_greens,
            reds = tally.red_count,
            "[Processor] Status"
        );
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
