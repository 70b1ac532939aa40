//! Application Facade
//!
//! Public API for binaries. Wires the feed, processor, workers and store
//! together and owns the shutdown ordering.

use super::{spawn_signal_sweep, EventClassifier, LeagueAggregator, ProcessorReport, SignalProcessor};
use crate::domain::LeagueStatsStore;
use crate::infrastructure::{
    init_tracing_with_level, spawn_notification_worker, spawn_stats_writer,
    DiscordNotifier, FeedClient, LogNotifier, Notifier, ShutdownManager, SignalRules, SignalsConfig,
};
use serde_json::Value;
use stats_db::LeagueStatsDatabase;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Live goal-signal bot
pub struct SignalBotApp {
    pub config: SignalsConfig,
    pub database: Arc<LeagueStatsDatabase>,
    pub shutdown: ShutdownManager,
}

impl SignalBotApp {
    /// Open the database and install the Ctrl+C handler
    pub async fn new(config: SignalsConfig) -> anyhow::Result<Self> {
        let database = Arc::new(LeagueStatsDatabase::new(&config.database.url).await?);
        let shutdown = ShutdownManager::new();
        shutdown.spawn_signal_handler();

        Ok(Self {
            config,
            database,
            shutdown,
        })
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Discord if a webhook is configured, the log otherwise
    pub fn notifier(&self) -> anyhow::Result<Arc<dyn Notifier>> {
        match &self.config.discord_webhook_url {
            Some(url) => Ok(Arc::new(DiscordNotifier::new(url.as_str())?)),
            None => {
                warn!("DISCORD_WEBHOOK_URL not set, notices will only be logged");
                Ok(Arc::new(LogNotifier))
            }
        }
    }

    /// Run until Ctrl+C or until the feed gives up.
    ///
    /// Shutdown order: feed and sweep stop, the processor exits and drops its
    /// handles, the stats writer and notification worker drain, then the
    /// database pool is closed.
    pub async fn run(self) -> anyhow::Result<ProcessorReport> {
        // Nothing is spawned yet, so a bad webhook only needs the pool closed
        let notifier = match self.notifier() {
            Ok(notifier) => notifier,
            Err(e) => {
                self.database.close().await;
                return Err(e);
            }
        };

        let store: Arc<dyn LeagueStatsStore> = self.database.clone();
        let (store_handle, writer_task) = spawn_stats_writer(Arc::clone(&store));

        let mut classifier =
            EventClassifier::new(self.config.signals.clone(), LeagueAggregator::new(store_handle));
        if self.config.signals.hydrate_on_startup {
            match store.load_all().await {
                Ok(rows) => classifier.hydrate(rows),
                Err(e) => warn!(error = %e, "Could not load league stats, starting from zero"),
            }
        }

        let (sink, notifier_task) = spawn_notification_worker(notifier);

        let (batch_tx, batch_rx) = mpsc::channel(self.config.feed.channel_capacity);
        let feed = FeedClient::new(
            self.config.feed_url(),
            self.config.feed.reconnect.clone(),
            batch_tx,
            self.shutdown.flag(),
        );
        let feed_task = tokio::spawn(feed.run());

        let sweep_task = spawn_signal_sweep(
            classifier.tracker().clone(),
            Duration::from_secs(self.config.sweep_interval_secs),
            self.shutdown.flag(),
        );

        let processor = SignalProcessor::new(classifier, sink, self.config.heartbeat_interval_secs);
        let report = processor.run(batch_rx, self.shutdown.flag()).await;

        // The processor also stops when the feed gives up
        self.shutdown.trigger();

        match feed_task.await {
            Ok(Ok(())) => info!("Feed stopped"),
            Ok(Err(e)) => error!("Feed stopped with error: {}", e),
            Err(e) => error!("Feed task panicked: {}", e),
        }
        if let Err(e) = sweep_task.await {
            error!("Sweep task panicked: {}", e);
        }

        info!("Draining pending stats writes...");
        if let Err(e) = writer_task.await {
            error!("Stats writer panicked: {}", e);
        }
        info!("Draining pending notifications...");
        if let Err(e) = notifier_task.await {
            error!("Notification worker panicked: {}", e);
        }

        self.database.close().await;
        Ok(report)
    }
}

/// Run recorded batches through a fresh processor with a log-only notifier
/// and no store. Every notice is delivered before this returns.
pub async fn replay_batches(rules: SignalRules, batches: Vec<Value>) -> ProcessorReport {
    let (sink, notifier_task) = spawn_notification_worker(Arc::new(LogNotifier));
    let classifier = EventClassifier::new(rules, LeagueAggregator::in_memory());
    let processor = SignalProcessor::new(classifier, sink, u64::MAX);

    let (tx, rx) = mpsc::channel(batches.len().max(1));
    let feeder = tokio::spawn(async move {
        for batch in batches {
            if tx.send(batch).await.is_err() {
                break;
            }
        }
    });

    let running = ShutdownManager::new();
    let report = processor.run(rx, running.flag()).await;

    if let Err(e) = feeder.await {
        error!("Replay feeder panicked: {}", e);
    }
    if let Err(e) = notifier_task.await {
        error!("Notification worker panicked: {}", e);
    }
    report
}

/// Initialize tracing for binaries with a specific log level
pub fn init_logging_with_level(level: &str) {
    init_tracing_with_level(level);
}
