//! External clients: the live feed and the Discord webhook

pub mod discord;
pub mod feed;

pub use discord::DiscordNotifier;
pub use feed::{FeedClient, FeedError, ReconnectPolicy};
