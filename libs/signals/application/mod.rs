//! Application Layer
//!
//! Per-record classification, match and league state, and the processing
//! loop. Depends on the domain and infrastructure layers.

pub mod aggregator;
pub mod classifier;
pub mod facade;
pub mod processor;
pub mod sweep;
pub mod tracker;

// Re-export application facade for binaries
pub use facade::{init_logging_with_level, replay_batches, SignalBotApp};

pub use aggregator::LeagueAggregator;
pub use classifier::EventClassifier;
pub use processor::{BatchError, ProcessorReport, ProcessorStats, SignalProcessor};
pub use sweep::{log_signal_sent, spawn_signal_sweep};
pub use tracker::{GoalLedger, MatchStateTracker};
