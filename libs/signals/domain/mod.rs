//! Domain Layer
//!
//! Contains pure business entities and domain models.
//! This layer has no dependencies on infrastructure or application layers.

pub mod match_state;
pub mod models;
pub mod notice;
pub mod stats;
pub mod store;

// Re-export feed models
pub use models::{
    parse_leading_int, GoalScorer, MatchUpdate, Statistic, STATUS_FINISHED, STATUS_HALF_TIME,
    UNKNOWN_LEAGUE,
};

// Re-export match state entities
pub use match_state::{Half, MatchIdentity, MatchKey, MatchPhase, MatchState};

// Re-export counters and notices
pub use notice::Notice;
pub use stats::{GlobalTally, LeagueStats, NoGoalsMode};
pub use store::{LeagueStatsStore, StoreError, StoreResult};
