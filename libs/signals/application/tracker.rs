//! Match State Tracker
//!
//! Per-match state keyed by `MatchKey`. Reads on unseen keys return defaults;
//! writes create the entry. Backed by a `DashMap` so the diagnostic sweep can
//! read through a cloned handle while the processor keeps writing.

use crate::domain::{Half, MatchKey, MatchPhase, MatchState};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Shared handle over every tracked match
#[derive(Debug, Clone, Default)]
pub struct MatchStateTracker {
    matches: Arc<DashMap<MatchKey, MatchState>>,
}

impl MatchStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, key: &MatchKey) -> MatchPhase {
        self.matches
            .get(key)
            .map(|state| state.phase)
            .unwrap_or_default()
    }

    /// Move `key` to `phase`. Moves outside the phase graph are refused.
    pub fn set_phase(&self, key: &MatchKey, phase: MatchPhase) -> bool {
        let mut state = self.matches.entry(key.clone()).or_default();
        if !state.phase.can_advance_to(phase) {
            warn!(
                match_key = %key,
                from = %state.phase,
                to = %phase,
                "Refusing phase transition"
            );
            return false;
        }
        state.phase = phase;
        true
    }

    pub fn snapshot(&self, key: &MatchKey) -> Option<String> {
        self.matches
            .get(key)
            .and_then(|state| state.signal_score_snapshot.clone())
    }

    pub fn set_snapshot(&self, key: &MatchKey, score: &str) {
        self.matches
            .entry(key.clone())
            .or_default()
            .signal_score_snapshot = Some(score.to_string());
    }

    /// Whether a signal was ever raised for `key`
    pub fn has_signal(&self, key: &MatchKey) -> bool {
        self.matches
            .get(key)
            .is_some_and(|state| state.signal_score_snapshot.is_some())
    }

    /// Record the signal-time score and enter `SignalSent` in one step
    pub fn record_signal(&self, key: &MatchKey, score: &str) -> bool {
        let mut state = self.matches.entry(key.clone()).or_default();
        if state.signal_score_snapshot.is_some() || !state.phase.can_advance_to(MatchPhase::SignalSent) {
            return false;
        }
        state.signal_score_snapshot = Some(score.to_string());
        state.phase = MatchPhase::SignalSent;
        true
    }

    pub fn has_half_time_notice(&self, key: &MatchKey) -> bool {
        self.matches
            .get(key)
            .is_some_and(|state| state.half_time_notified)
    }

    /// Mark the half-time notice as sent. Only allowed while `SignalSent`;
    /// returns false if refused or already marked.
    pub fn mark_half_time_notice(&self, key: &MatchKey) -> bool {
        let Some(mut state) = self.matches.get_mut(key) else {
            return false;
        };
        if state.phase != MatchPhase::SignalSent || state.half_time_notified {
            return false;
        }
        state.half_time_notified = true;
        true
    }

    /// Remember the latest known half for `key`; unknown halves are ignored
    pub fn observe_half(&self, key: &MatchKey, half: Half) {
        if half.is_known() {
            self.matches.entry(key.clone()).or_default().last_half = half;
        }
    }

    pub fn last_half(&self, key: &MatchKey) -> Half {
        self.matches
            .get(key)
            .map(|state| state.last_half)
            .unwrap_or_default()
    }

    /// Matches currently waiting on a signal outcome, sorted by key
    pub fn signal_sent_matches(&self) -> Vec<MatchKey> {
        let mut keys: Vec<MatchKey> = self
            .matches
            .iter()
            .filter(|entry| entry.value().phase == MatchPhase::SignalSent)
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Append-only set of processed goal-event identifiers
#[derive(Debug, Default)]
pub struct GoalLedger {
    seen: HashSet<String>,
}

impl GoalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event_key: &str) -> bool {
        self.seen.contains(event_key)
    }

    /// Returns true if `event_key` was not seen before
    pub fn insert(&mut self, event_key: &str) -> bool {
        self.seen.insert(event_key.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
