//! Notifications produced by the classifier

use super::match_state::MatchKey;
use super::stats::LeagueStats;
use std::fmt;

const RULE: &str = "-----------------------------------------------------------------------";

/// Something worth telling the channel about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Dangerous-attack threshold crossed
    Signal {
        league: String,
        home_team: String,
        away_team: String,
        home_attacks: Option<u32>,
        away_attacks: Option<u32>,
        score: String,
        minute: u32,
        league_stats: LeagueStats,
    },
    /// Signalled match reached the interval without resolving
    HalfTimeFollowUp { match_key: MatchKey },
    /// Goal scored after the signal
    Goal {
        scorer: String,
        home_team: String,
        away_team: String,
        minute: String,
        score: String,
    },
    /// Follow-up to a goal notice
    SignalConfirmed { home_team: String, away_team: String },
    /// Match finished with a different score than at signal time
    Green { home_team: String, away_team: String },
    /// Match finished with the signal-time score
    Red { home_team: String, away_team: String },
}

impl Notice {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::Signal { .. } => "signal",
            Notice::HalfTimeFollowUp { .. } => "half_time",
            Notice::Goal { .. } => "goal",
            Notice::SignalConfirmed { .. } => "signal_confirmed",
            Notice::Green { .. } => "green",
            Notice::Red { .. } => "red",
        }
    }

    /// Chat-ready text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn count(value: &Option<u32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Signal {
                league,
                home_team,
                away_team,
                home_attacks,
                away_attacks,
                score,
                minute,
                league_stats,
            } => {
                writeln!(f, "{}", RULE)?;
                writeln!(f, "🟢 **POSSIBLE GOAL ENTRY!** 🟢\n")?;
                writeln!(f, "**League:** {}\n", league)?;
                writeln!(
                    f,
                    "**Dangerous attacks:** {} **({})** x **({})** {}.\n",
                    home_team,
                    count(home_attacks),
                    count(away_attacks),
                    away_team
                )?;
                writeln!(
                    f,
                    "**Current score:** {} **{}** {} at **{}** minutes.\n",
                    home_team, score, away_team, minute
                )?;
                writeln!(f, "📊 **{} stats** 📊\n", league)?;
                writeln!(f, "**🟢 1st Half:** {}", league_stats.first_half)?;
                writeln!(f, "**🟢 2nd Half:** {}", league_stats.second_half)?;
                writeln!(f, "**🔴 No Goals:** {}", league_stats.no_goals)?;
                write!(f, "{}", RULE)
            }
            Notice::HalfTimeFollowUp { match_key } => {
                writeln!(f, "{}", RULE)?;
                writeln!(f, "⚠️ **GOAL ENTRY - 2nd HALF** ⚠️")?;
                writeln!(f, "{}", match_key)?;
                write!(f, "{}", RULE)
            }
            Notice::Goal {
                scorer,
                home_team,
                away_team,
                minute,
                score,
            } => {
                writeln!(f, "{}", RULE)?;
                writeln!(f, "*GOOOOOOOOOOOOAL!* ⚽\n")?;
                writeln!(
                    f,
                    "**{}** scored in **{}** vs **{}** at **{}** minutes.\n",
                    scorer, home_team, away_team, minute
                )?;
                writeln!(f, "**Score:** {}", score)?;
                write!(f, "{}", RULE)
            }
            Notice::SignalConfirmed {
                home_team,
                away_team,
            }
            | Notice::Green {
                home_team,
                away_team,
            } => {
                writeln!(f, "{}", RULE)?;
                writeln!(f, "🟢 **GREEN!** 🟢\n")?;
                writeln!(
                    f,
                    "**{}** vs **{}** had a goal after the entry. ✅",
                    home_team, away_team
                )?;
                write!(f, "{}", RULE)
            }
            Notice::Red {
                home_team,
                away_team,
            } => {
                writeln!(f, "{}", RULE)?;
                writeln!(f, "🔴 **RED** 🔴\n")?;
                writeln!(
                    f,
                    "**{}** vs **{}** finished without a goal after the entry.",
                    home_team, away_team
                )?;
                write!(f, "{}", RULE)
            }
        }
    }
}
