use crate::domain::{MatchIdentity, NoGoalsMode};
use crate::infrastructure::client::feed::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Goal signal bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub signals: SignalRules,
    /// Interval of the SIGNAL_SENT listing
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Interval of the processor status line
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Feed API key from .env (not in YAML)
    #[serde(skip)]
    pub api_key: String,

    /// Discord webhook from .env (not in YAML)
    #[serde(skip)]
    pub discord_webhook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub reconnect: ReconnectPolicy,
    /// Batches buffered between the feed task and the processor
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timezone: default_timezone(),
            reconnect: ReconnectPolicy::default(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Knobs of the classification rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRules {
    /// Statistic compared against the match minute
    #[serde(default = "default_dangerous_attacks_stat")]
    pub dangerous_attacks_stat: String,
    #[serde(default)]
    pub no_goals_mode: NoGoalsMode,
    #[serde(default)]
    pub match_identity: MatchIdentity,
    /// Seed league counters from the database at startup
    #[serde(default = "default_true")]
    pub hydrate_on_startup: bool,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            dangerous_attacks_stat: default_dangerous_attacks_stat(),
            no_goals_mode: NoGoalsMode::default(),
            match_identity: MatchIdentity::default(),
            hydrate_on_startup: true,
        }
    }
}

fn default_feed_url() -> String {
    "wss://wss.allsportsapi.com/live_events".to_string()
}

fn default_timezone() -> String {
    "+03:00".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

fn default_database_url() -> String {
    "sqlite://league_stats.db".to_string()
}

fn default_dangerous_attacks_stat() -> String {
    "Dangerous Attacks".to_string()
}

fn default_sweep_interval() -> u64 {
    600
}

fn default_heartbeat_interval() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl SignalsConfig {
    /// Load configuration from YAML file and .env
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config = Self::parse(&yaml_content)?;

        dotenv::dotenv().ok(); // Don't fail if .env doesn't exist

        config.api_key = std::env::var("API_FOOTBALL_KEY")
            .map_err(|_| ConfigError::EnvVarMissing("API_FOOTBALL_KEY".to_string()))?;

        config.discord_webhook_url = std::env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.is_empty());

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            info!("Overriding database URL from environment variable");
            config.database.url = db_url;
        }

        config.validate()?;
        if config.api_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "API_FOOTBALL_KEY cannot be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Parse and validate YAML without touching the environment
    pub fn parse(yaml_content: &str) -> Result<Self> {
        let config: SignalsConfig = serde_yaml::from_str(yaml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.feed.url.starts_with("ws://") || self.feed.url.starts_with("wss://")) {
            return Err(ConfigError::ValidationError(
                "feed.url must be a ws:// or wss:// URL".to_string(),
            ));
        }

        if self.feed.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "feed.channel_capacity must be greater than 0".to_string(),
            ));
        }

        self.feed
            .reconnect
            .validate()
            .map_err(ConfigError::ValidationError)?;

        if self.database.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url cannot be empty".to_string(),
            ));
        }

        if self.signals.dangerous_attacks_stat.is_empty() {
            return Err(ConfigError::ValidationError(
                "signals.dangerous_attacks_stat cannot be empty".to_string(),
            ));
        }

        if self.sweep_interval_secs == 0 || self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "sweep_interval_secs and heartbeat_interval_secs must be greater than 0"
                    .to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Full feed URL including credentials
    pub fn feed_url(&self) -> String {
        format!(
            "{}?widgetKey={}&timezone={}",
            self.feed.url, self.api_key, self.feed.timezone
        )
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Feed URL: {}", self.feed.url);
        info!("  Feed timezone: {}", self.feed.timezone);
        info!("  Reconnect: {}", self.feed.reconnect);
        info!("  Database URL: {}", self.database.url);
        info!("  Signal statistic: {}", self.signals.dangerous_attacks_stat);
        info!("  No-goals mode: {:?}", self.signals.no_goals_mode);
        info!("  Match identity: {:?}", self.signals.match_identity);
        info!("  Hydrate on startup: {}", self.signals.hydrate_on_startup);
        info!("  Sweep interval: {} seconds", self.sweep_interval_secs);
        info!("  Heartbeat interval: {} seconds", self.heartbeat_interval_secs);
        info!(
            "  Discord: {}",
            if self.discord_webhook_url.is_some() { "enabled" } else { "disabled (log only)" }
        );
        info!("  Log level: {}", self.log_level);
    }
}
