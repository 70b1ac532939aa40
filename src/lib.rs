//! Goal Signal Bot - Main Library
//!
//! Binaries and shared binary utilities for the live goal-signal bot.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **signals**: Feed processing, classification and notifications (re-exported from workspace)
//! - **stats_db**: SQLite league counters (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,no_run
//! use goal_signal_bot::bin_common::{load_config_from_env, ConfigType};
//! use goal_signal_bot::signals::application::SignalBotApp;
//! ```

// Re-export workspace libraries for convenience
pub use signals;
pub use stats_db;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
    pub use runner::{BinaryRunner, RunConfig};
}
