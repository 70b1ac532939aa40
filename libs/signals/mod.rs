//! Live goal-signal processing
//!
//! Consumes a live football events feed, raises a signal when a team's
//! dangerous attacks catch up with the match clock, follows each signalled
//! match to a GREEN (goal after signal) or RED (no goal) outcome, and keeps
//! per-league outcome counters in SQLite.
//!
//! Layered like the rest of the workspace:
//! - `domain`: feed records, match state, counters, notices
//! - `application`: classifier, trackers, processor loop, facade
//! - `infrastructure`: feed socket, Discord webhook, store writer, config

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    replay_batches, EventClassifier, LeagueAggregator, MatchStateTracker, ProcessorReport,
    SignalBotApp, SignalProcessor,
};
pub use domain::{Half, LeagueStats, MatchKey, MatchPhase, MatchUpdate, Notice};
pub use infrastructure::{ShutdownManager, SignalRules, SignalsConfig};
