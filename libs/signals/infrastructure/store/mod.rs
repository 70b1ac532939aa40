//! Fire-and-forget writes to the league stats store
//!
//! Callers hand upserts to a `StoreHandle`, which never waits. A single
//! writer task applies them in order and logs failures. The task ends once
//! every handle has been dropped and the queue is drained.

mod sqlite;

use crate::domain::{LeagueStats, LeagueStatsStore};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// One pending write: the full counter triple for a league
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsUpsert {
    pub league: String,
    pub stats: LeagueStats,
}

/// Non-blocking entry point for store writes
#[derive(Debug, Clone)]
pub struct StoreHandle {
    tx: Option<UnboundedSender<StatsUpsert>>,
}

impl StoreHandle {
    /// Handle feeding the given queue
    pub fn new(tx: UnboundedSender<StatsUpsert>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Handle that drops every write (in-memory only runs)
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn is_attached(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue an upsert for `league`
    pub fn upsert(&self, league: &str, stats: LeagueStats) {
        let Some(tx) = &self.tx else {
            return;
        };
        let write = StatsUpsert {
            league: league.to_string(),
            stats,
        };
        if tx.send(write).is_err() {
            warn!(league = %league, "Stats writer is gone, dropping upsert");
        }
    }
}

/// Spawn the writer task for `store`
pub fn spawn_stats_writer(store: Arc<dyn LeagueStatsStore>) -> (StoreHandle, JoinHandle<()>) {
    let (tx, rx) = unbounded_channel();
    let task = tokio::spawn(run_stats_writer(store, rx));
    (StoreHandle::new(tx), task)
}

async fn run_stats_writer(store: Arc<dyn LeagueStatsStore>, mut rx: UnboundedReceiver<StatsUpsert>) {
    let mut written = 0u64;
    let mut failed = 0u64;

    while let Some(write) = rx.recv().await {
        match store.upsert(&write.league, write.stats).await {
            Ok(()) => {
                written += 1;
                debug!(
                    league = %write.league,
                    first_half = write.stats.first_half,
                    second_half = write.stats.second_half,
                    no_goals = write.stats.no_goals,
                    "League stats updated"
                );
            }
            Err(e) => {
                failed += 1;
                error!(league = %write.league, error = %e, "Failed to update league stats");
            }
        }
    }

    info!(written, failed, "Stats writer drained and stopped");
}
