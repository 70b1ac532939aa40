//! Replay recorded feed batches without a socket, database or Discord
//!
//! Usage: replay_feed <batches.jsonl> [config.yaml]
//! Each non-empty line of the input is one feed frame (a JSON array of records).

use anyhow::{bail, Context, Result};
use goal_signal_bot::bin_common::parse_args;
use goal_signal_bot::signals::application::{init_logging_with_level, replay_batches};
use goal_signal_bot::signals::infrastructure::{SignalRules, SignalsConfig};
use serde_json::Value;
use tracing::{info, warn};

fn load_rules(config_path: Option<&String>) -> Result<(SignalRules, String)> {
    match config_path {
        Some(path) => {
            let yaml = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            let config = SignalsConfig::parse(&yaml)?;
            Ok((config.signals, config.log_level))
        }
        None => Ok((SignalRules::default(), "info".to_string())),
    }
}

fn load_batches(path: &str) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;

    let mut batches = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(batch) => batches.push(batch),
            Err(e) => warn!("Skipping line {}: {}", number + 1, e),
        }
    }
    Ok(batches)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();
    let Some(input) = args.first() else {
        bail!("usage: replay_feed <batches.jsonl> [config.yaml]");
    };

    let (rules, log_level) = load_rules(args.get(1))?;
    init_logging_with_level(&log_level);

    let batches = load_batches(input)?;
    info!("Replaying {} batches from {}", batches.len(), input);

    let report = replay_batches(rules, batches).await;

    info!("");
    info!("========================================");
    info!("Replay finished");
    info!("{}", report);
    info!("========================================");
    Ok(())
}
