//! Signal outcome counters

use super::match_state::Half;
use serde::{Deserialize, Serialize};

/// Per-league outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStats {
    /// Goals after a signal, scored in the first half
    pub first_half: u32,
    /// Goals after a signal, scored in the second half
    pub second_half: u32,
    /// Signalled matches that finished without a further goal
    pub no_goals: u32,
}

impl LeagueStats {
    /// Bump the counter for `half`. Returns false when the half is unknown.
    pub fn record_half(&mut self, half: Half) -> bool {
        match half {
            Half::First => self.first_half += 1,
            Half::Second => self.second_half += 1,
            Half::Unknown => return false,
        }
        true
    }
}

/// Process-wide totals across every league
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalTally {
    pub first_half_greens: u32,
    pub second_half_greens: u32,
    pub red_count: u32,
}

impl GlobalTally {
    pub fn record_green(&mut self, half: Half) {
        match half {
            Half::First => self.first_half_greens += 1,
            Half::Second => self.second_half_greens += 1,
            Half::Unknown => {}
        }
    }

    /// Count one red and return the new total
    pub fn record_red(&mut self) -> u32 {
        self.red_count += 1;
        self.red_count
    }
}

/// Value written to a league's `no_goals` counter on a red outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoGoalsMode {
    /// Global red total, shared by every league
    #[default]
    GlobalTotal,
    /// The league's own red count
    PerLeague,
}
