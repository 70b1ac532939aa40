//! Binary runner utilities
//!
//! Standard banners around a binary's main routine.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heartbeat_interval_secs: 300, // 5 minutes default
        }
    }

    pub fn with_heartbeat(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = secs;
        self
    }
}

/// Trait for binary applications
///
/// `run` returns an optional one-line summary printed in the shutdown banner.
pub trait BinaryRunner {
    /// Run the application until it stops
    async fn run(&mut self) -> anyhow::Result<Option<String>>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        info!("Heartbeat every {}s", config.heartbeat_interval_secs);
        info!("Press Ctrl+C to stop");
        info!("========================================");
        info!("");
    }

    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} stopped gracefully", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with banners around `run`
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let summary = self.run().await?;
        self.print_shutdown(summary.as_deref());
        Ok(())
    }
}
