//! League Aggregator
//!
//! In-memory per-league counters, authoritative for the process lifetime.
//! Every change is mirrored to the store through a fire-and-forget handle.

use crate::domain::{Half, LeagueStats};
use crate::infrastructure::store::StoreHandle;
use std::collections::HashMap;
use tracing::{debug, info};

pub struct LeagueAggregator {
    leagues: HashMap<String, LeagueStats>,
    store: StoreHandle,
}

impl LeagueAggregator {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            leagues: HashMap::new(),
            store,
        }
    }

    /// Aggregator that never touches a store
    pub fn in_memory() -> Self {
        Self::new(StoreHandle::detached())
    }

    /// Seed counters from previously stored rows
    pub fn hydrate(&mut self, rows: impl IntoIterator<Item = (String, LeagueStats)>) {
        let mut loaded = 0usize;
        for (league, stats) in rows {
            self.leagues.insert(league, stats);
            loaded += 1;
        }
        info!(leagues = loaded, "League stats hydrated from store");
    }

    /// Count a goal after a signal in `half` and mirror the league's counters
    pub fn record_green(&mut self, league: &str, half: Half) -> LeagueStats {
        let stats = self.leagues.entry(league.to_string()).or_default();
        if !stats.record_half(half) {
            debug!(league = %league, "Green with unknown half, counters unchanged");
        }
        let stats = *stats;
        self.store.upsert(league, stats);
        stats
    }

    /// Set the league's no-goal counter and mirror the league's counters
    pub fn record_red(&mut self, league: &str, no_goals: u32) -> LeagueStats {
        let stats = self.leagues.entry(league.to_string()).or_default();
        stats.no_goals = stats.no_goals.max(no_goals);
        let stats = *stats;
        self.store.upsert(league, stats);
        stats
    }

    /// Current counters for `league`, zeros if never seen
    pub fn snapshot(&self, league: &str) -> LeagueStats {
        self.leagues.get(league).copied().unwrap_or_default()
    }

    /// Tracked league names, sorted
    pub fn leagues(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.leagues.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
