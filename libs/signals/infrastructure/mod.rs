//! Infrastructure Layer
//!
//! Implementations of external interfaces (feed socket, webhook, database,
//! configuration). Depends on the domain layer but not on the application layer.

pub mod client;
pub mod config;
pub mod heartbeat;
pub mod logging;
pub mod notify;
pub mod shutdown;
pub mod store;

pub use client::{DiscordNotifier, FeedClient, FeedError, ReconnectPolicy};
pub use config::{ConfigError, SignalsConfig, SignalRules};
pub use heartbeat::Heartbeat;
pub use logging::init_tracing_with_level;
pub use notify::{spawn_notification_worker, LogNotifier, NotificationSink, Notifier, NotifyError};
pub use shutdown::ShutdownManager;
pub use store::{spawn_stats_writer, StoreHandle};
