//! Contract for the durable league counter store

use super::stats::LeagueStats;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Stats store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable mirror of per-league counters.
///
/// Keyed by league name; `upsert` inserts the row or replaces its counters.
#[async_trait]
pub trait LeagueStatsStore: Send + Sync {
    async fn upsert(&self, league: &str, stats: LeagueStats) -> StoreResult<()>;

    async fn get(&self, league: &str) -> StoreResult<Option<LeagueStats>>;

    /// Every stored league, used to seed in-memory counters at startup
    async fn load_all(&self) -> StoreResult<Vec<(String, LeagueStats)>>;
}
