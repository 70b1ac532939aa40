//! Discord webhook notifications

use crate::infrastructure::notify::{Notifier, NotifyError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;

/// Discord rejects message content longer than this
const MAX_CONTENT_CHARS: usize = 2000;

/// Discord webhook client
#[derive(Clone)]
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

impl DiscordNotifier {
    /// Create a notifier posting to `webhook_url`
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotifyError> {
        let webhook_url = webhook_url.into();
        match Url::parse(&webhook_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(NotifyError::InvalidUrl(webhook_url)),
        }

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, webhook_url })
    }
}

fn truncate_content(text: &str) -> &str {
    match text.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        let message = WebhookMessage {
            content: truncate_content(text),
        };

        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await?;

        if resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(NotifyError::Rejected { status, body })
    }
}
