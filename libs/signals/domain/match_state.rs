//! Per-match identity and state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a match from the signal's point of view.
///
/// Valid moves: `None -> SignalSent -> {Green | Red} -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchPhase {
    #[default]
    None,
    SignalSent,
    Green,
    Red,
    Finished,
}

impl MatchPhase {
    /// Whether moving from `self` to `next` respects the phase graph
    pub fn can_advance_to(self, next: MatchPhase) -> bool {
        use MatchPhase::*;
        matches!(
            (self, next),
            (None, SignalSent)
                | (SignalSent, Green)
                | (SignalSent, Red)
                | (Green, Finished)
                | (Red, Finished)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPhase::None => "NONE",
            MatchPhase::SignalSent => "SIGNAL_SENT",
            MatchPhase::Green => "GREEN",
            MatchPhase::Red => "RED",
            MatchPhase::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of the match an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Half {
    First,
    Second,
    #[default]
    Unknown,
}

impl Half {
    /// Parse the feed's `info_time` marker ("1st Half" / "2nd Half")
    pub fn from_info_time(info_time: Option<&str>) -> Self {
        match info_time {
            Some("1st Half") => Half::First,
            Some("2nd Half") => Half::Second,
            _ => Half::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Half::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Half::First => "1st Half",
            Half::Second => "2nd Half",
            Half::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a match, derived from its team names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey(String);

impl MatchKey {
    pub fn new(home_team: &str, away_team: &str) -> Self {
        Self(format!("{} vs {}", home_team, away_team))
    }

    pub fn league_qualified(league: &str, home_team: &str, away_team: &str) -> Self {
        Self(format!("{} | {} vs {}", league, home_team, away_team))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How match keys are derived from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchIdentity {
    /// `"<home> vs <away>"`; identical fixtures in different leagues collide
    #[default]
    TeamPair,
    /// `"<league> | <home> vs <away>"`
    LeagueQualified,
}

impl MatchIdentity {
    pub fn key(&self, league: &str, home_team: &str, away_team: &str) -> MatchKey {
        match self {
            MatchIdentity::TeamPair => MatchKey::new(home_team, away_team),
            MatchIdentity::LeagueQualified => MatchKey::league_qualified(league, home_team, away_team),
        }
    }
}

/// Tracked state of one match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    pub phase: MatchPhase,
    /// Score at the moment the signal was raised
    pub signal_score_snapshot: Option<String>,
    pub half_time_notified: bool,
    /// Most recent half-indicator seen for this match
    pub last_half: Half,
}
