//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize tracing with a default level; `RUST_LOG` wins when set
pub fn init_tracing_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()));

    // A subscriber may already be installed (tests, replays in one process)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .try_init();
}
