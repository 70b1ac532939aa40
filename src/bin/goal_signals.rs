//! Live goal-signal bot
//!
//! Usage: goal_signals [config.yaml]
//! Config path falls back to SIGNALS_CONFIG_PATH, then config/signals_config.yaml.

use anyhow::{anyhow, Result};
use goal_signal_bot::bin_common::{load_config_from_env, parse_args, BinaryRunner, ConfigType, RunConfig};
use goal_signal_bot::signals::application::{init_logging_with_level, SignalBotApp};
use goal_signal_bot::signals::infrastructure::SignalsConfig;

struct GoalSignals {
    run_config: RunConfig,
    app: Option<SignalBotApp>,
}

impl BinaryRunner for GoalSignals {
    async fn run(&mut self) -> Result<Option<String>> {
        let app = self
            .app
            .take()
            .ok_or_else(|| anyhow!("goal signal bot already ran"))?;
        let report = app.run().await?;
        Ok(Some(report.to_string()))
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_type = match parse_args().into_iter().next() {
        Some(path) => ConfigType::Custom(path),
        None => ConfigType::Signals,
    };
    let config_path = load_config_from_env(config_type);
    let config = SignalsConfig::load(&config_path)?;

    init_logging_with_level(&config.log_level);
    config.log();

    let run_config = RunConfig::new("Goal Signal Bot").with_heartbeat(config.heartbeat_interval_secs);
    let app = SignalBotApp::new(config).await?;

    let mut runner = GoalSignals {
        run_config,
        app: Some(app),
    };
    runner.execute().await
}
