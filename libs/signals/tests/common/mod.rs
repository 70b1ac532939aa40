//! Common test utilities for signals integration tests
//!
//! Record builders, recording collaborators and a scripted feed server.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use signals::application::{EventClassifier, LeagueAggregator};
use signals::domain::{GoalScorer, MatchKey, MatchUpdate, Statistic};
use signals::infrastructure::notify::{Notifier, NotifyError};
use signals::infrastructure::store::{StatsUpsert, StoreHandle};
use signals::infrastructure::SignalRules;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Fluent builder for feed records
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    update: MatchUpdate,
}

/// Start a record for `home` vs `away` in "Serie A"
pub fn record(home: &str, away: &str) -> RecordBuilder {
    RecordBuilder {
        update: MatchUpdate {
            home_team: Some(home.to_string()),
            away_team: Some(away.to_string()),
            league_name: Some("Serie A".to_string()),
            ..Default::default()
        },
    }
}

impl RecordBuilder {
    pub fn league(mut self, league: &str) -> Self {
        self.update.league_name = Some(league.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.update.status = Some(status.to_string());
        self
    }

    pub fn score(mut self, score: &str) -> Self {
        self.update.final_result = Some(score.to_string());
        self
    }

    pub fn event_key(mut self, event_key: &str) -> Self {
        self.update.event_key = Some(event_key.to_string());
        self
    }

    pub fn info_time(mut self, info_time: &str) -> Self {
        self.update.info_time = Some(info_time.to_string());
        self
    }

    /// Add a "Dangerous Attacks" statistic
    pub fn attacks(mut self, home: &str, away: &str) -> Self {
        self.update
            .statistics
            .get_or_insert_with(Vec::new)
            .push(Statistic {
                stat_type: Some("Dangerous Attacks".to_string()),
                home: Some(home.to_string()),
                away: Some(away.to_string()),
            });
        self
    }

    /// Append a goal by a home-side scorer
    pub fn goal(mut self, scorer: &str, time: &str, info_time: &str) -> Self {
        self.update
            .goalscorers
            .get_or_insert_with(Vec::new)
            .push(GoalScorer {
                home_scorer: Some(scorer.to_string()),
                away_scorer: Some(String::new()),
                time: Some(time.to_string()),
                info_time: Some(info_time.to_string()),
            });
        self
    }

    /// Append a goal entry with neither scorer field filled
    pub fn anonymous_goal(mut self, time: &str) -> Self {
        self.update
            .goalscorers
            .get_or_insert_with(Vec::new)
            .push(GoalScorer {
                time: Some(time.to_string()),
                ..Default::default()
            });
        self
    }

    pub fn build(self) -> MatchUpdate {
        self.update
    }
}

pub fn key(home: &str, away: &str) -> MatchKey {
    MatchKey::new(home, away)
}

/// Classifier with default rules and no store
pub fn classifier() -> EventClassifier {
    EventClassifier::new(SignalRules::default(), LeagueAggregator::in_memory())
}

/// Classifier whose store writes land in the returned receiver
pub fn recording_classifier(rules: SignalRules) -> (EventClassifier, UnboundedReceiver<StatsUpsert>) {
    let (tx, rx) = unbounded_channel();
    let classifier = EventClassifier::new(rules, LeagueAggregator::new(StoreHandle::new(tx)));
    (classifier, rx)
}

/// Notifier that keeps every delivered message
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
        Ok(())
    }
}

/// Feed server playing one script per accepted connection.
///
/// Connection `n` receives every frame of `scripts[n]` and is then closed.
/// Connections beyond the last script stay open and silent.
pub struct MockFeedServer {
    pub addr: SocketAddr,
    connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
}

impl MockFeedServer {
    pub async fn start(scripts: Vec<Vec<String>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(Notify::new());

        let accepted = Arc::clone(&connections);
        let stop = Arc::clone(&shutdown);
        let scripts = Arc::new(scripts);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        let Ok((stream, _)) = result else { break };
                        let index = accepted.fetch_add(1, Ordering::SeqCst);
                        let script = scripts.get(index).cloned();
                        let stop = Arc::clone(&stop);
                        tokio::spawn(async move {
                            Self::play(stream, script, stop).await;
                        });
                    }
                    _ = stop.notified() => break,
                }
            }
        });

        Self {
            addr,
            connections,
            shutdown,
        }
    }

    async fn play(stream: tokio::net::TcpStream, script: Option<Vec<String>>, stop: Arc<Notify>) {
        let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
            return;
        };
        let (mut write, mut read) = ws.split();

        match script {
            Some(frames) => {
                for frame in frames {
                    if write.send(Message::Text(frame)).await.is_err() {
                        return;
                    }
                }
                let _ = write.send(Message::Close(None)).await;
            }
            None => loop {
                tokio::select! {
                    msg = read.next() => match msg {
                        Some(Ok(msg)) if msg.is_close() => break,
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => break,
                    },
                    _ = stop.notified() => break,
                }
            },
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Drop for MockFeedServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
    }
}

/// Serialize records as one feed frame
pub fn frame(records: &[Value]) -> String {
    Value::Array(records.to_vec()).to_string()
}
