//! Live events feed
//!
//! Connects to the live-events WebSocket and forwards every text frame,
//! parsed as JSON, to the processor over a bounded channel. A single reader
//! task owns the socket so batches arrive at the processor in the order the
//! server sent them. Processor state is untouched by reconnects.

mod reconnect;

pub use reconnect::ReconnectPolicy;

use crate::infrastructure::shutdown::interruptible_sleep;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    #[error("Reconnection gave up after {attempts} attempts")]
    ReconnectExhausted { attempts: usize },
}

/// Why a connected session ended
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    ProcessorGone,
    Shutdown,
}

/// Single-reader WebSocket client for the live feed
pub struct FeedClient {
    url: String,
    policy: ReconnectPolicy,
    tx: mpsc::Sender<Value>,
    shutdown: Arc<AtomicBool>,
    frames: u64,
    malformed: u64,
}

impl FeedClient {
    pub fn new(
        url: impl Into<String>,
        policy: ReconnectPolicy,
        tx: mpsc::Sender<Value>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            url: url.into(),
            policy,
            tx,
            shutdown,
            frames: 0,
            malformed: 0,
        }
    }

    fn is_running(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Connect and stream until shutdown, the processor goes away, or the
    /// reconnect policy gives up.
    pub async fn run(mut self) -> Result<(), FeedError> {
        let mut attempt = 0usize;
        info!("[Feed] Starting feed client for {}", redact(&self.url));
        info!("[Feed] Reconnect policy: {}", self.policy);

        while self.is_running() {
            match self.connect().await {
                Ok(stream) => {
                    attempt = 0;
                    info!("[Feed] Connected");
                    match self.stream(stream).await {
                        Ok(SessionEnd::ProcessorGone) => {
                            info!("[Feed] Processor channel closed, stopping feed");
                            return Ok(());
                        }
                        Ok(SessionEnd::Shutdown) => break,
                        Ok(SessionEnd::Closed) => warn!("[Feed] Connection closed by server"),
                        Err(e) => error!("[Feed] Connection lost: {}", e),
                    }
                }
                Err(e) => error!("[Feed] Connection failed: {}", e),
            }

            if !self.is_running() {
                break;
            }

            let Some(delay) = self.policy.next_delay(attempt) else {
                error!("[Feed] Giving up after {} reconnect attempts", attempt);
                return Err(FeedError::ReconnectExhausted { attempts: attempt });
            };
            attempt += 1;
            info!("[Feed] Reconnecting in {:?} (attempt {})", delay, attempt);
            interruptible_sleep(&self.shutdown, delay).await;
        }

        info!(
            "[Feed] Stopped after {} frames ({} malformed)",
            self.frames, self.malformed
        );
        Ok(())
    }

    async fn connect(&self) -> Result<FeedStream, FeedError> {
        let (stream, _response) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(self.url.as_str()))
            .await
            .map_err(|_| FeedError::Timeout(CONNECT_TIMEOUT))??;
        Ok(stream)
    }

    async fn stream(&mut self, stream: FeedStream) -> Result<SessionEnd, FeedError> {
        let (mut write, mut read) = stream.split();
        let mut shutdown_poll = tokio::time::interval(SHUTDOWN_POLL);

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if !self.forward(&text).await {
                            return Ok(SessionEnd::ProcessorGone);
                        }
                    }
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => {
                            if !self.forward(text).await {
                                return Ok(SessionEnd::ProcessorGone);
                            }
                        }
                        Err(_) => {
                            self.malformed += 1;
                            warn!("[Feed] Dropping non-UTF-8 binary frame ({} bytes)", bytes.len());
                        }
                    },
                    Some(Ok(Message::Ping(data))) => write.send(Message::Pong(data)).await?,
                    Some(Ok(Message::Close(frame))) => {
                        debug!("[Feed] Close frame: {:?}", frame);
                        return Ok(SessionEnd::Closed);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(SessionEnd::Closed),
                },
                _ = shutdown_poll.tick() => {
                    if !self.is_running() {
                        let _ = write.send(Message::Close(None)).await;
                        return Ok(SessionEnd::Shutdown);
                    }
                }
            }
        }
    }

    /// Parse one frame and hand it to the processor. Returns false once the
    /// processor side of the channel is gone.
    async fn forward(&mut self, text: &str) -> bool {
        self.frames += 1;
        match serde_json::from_str::<Value>(text) {
            Ok(batch) => self.tx.send(batch).await.is_ok(),
            Err(e) => {
                self.malformed += 1;
                warn!("[Feed] Dropping non-JSON frame: {}", e);
                true
            }
        }
    }
}

/// URL without its query string, which carries the API key
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(tx: mpsc::Sender<Value>) -> FeedClient {
        FeedClient::new(
            "wss://example.invalid/live?widgetKey=secret",
            ReconnectPolicy::Never,
            tx,
            Arc::new(AtomicBool::new(true)),
        )
    }

    #[test]
    fn test_redact_hides_credentials() {
        assert_eq!(redact("wss://host/live?widgetKey=secret&timezone=+03:00"), "wss://host/live");
        assert_eq!(redact("wss://host/live"), "wss://host/live");
    }

    #[tokio::test]
    async fn test_forward_keeps_order_and_drops_garbage() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut feed = client(tx);

        assert!(feed.forward(r#"[{"event_key": 1}]"#).await);
        assert!(feed.forward("not json").await);
        assert!(feed.forward(r#"[{"event_key": 2}]"#).await);

        assert_eq!(rx.recv().await.unwrap()[0]["event_key"], 1);
        assert_eq!(rx.recv().await.unwrap()[0]["event_key"], 2);
        assert!(rx.try_recv().is_err());
        assert_eq!(feed.frames, 3);
        assert_eq!(feed.malformed, 1);
    }

    #[tokio::test]
    async fn test_forward_reports_closed_processor() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut feed = client(tx);
        assert!(!feed.forward("[]").await);
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_already_shut_down() {
        let (tx, _rx) = mpsc::channel(1);
        let feed = FeedClient::new(
            "wss://example.invalid/live",
            ReconnectPolicy::default(),
            tx,
            Arc::new(AtomicBool::new(false)),
        );
        assert!(feed.run().await.is_ok());
    }
}
