//! Event Classifier
//!
//! Turns one feed record into zero or more notices. Rules run in a fixed
//! order per record: half-time, goal, signal, finish. A record that reports
//! a goal and the final whistle together is therefore resolved as a goal
//! first, and the finish rule then sees the match already GREEN.

use super::aggregator::LeagueAggregator;
use super::tracker::{GoalLedger, MatchStateTracker};
use crate::domain::{
    parse_leading_int, GlobalTally, Half, LeagueStats, MatchKey, MatchPhase, MatchUpdate,
    NoGoalsMode, Notice,
};
use crate::infrastructure::config::SignalRules;
use tracing::{debug, info, warn};

/// Names shared by every rule for the record being classified
struct RecordContext<'a> {
    key: MatchKey,
    league: &'a str,
    home_team: &'a str,
    away_team: &'a str,
}

pub struct EventClassifier {
    rules: SignalRules,
    tracker: MatchStateTracker,
    ledger: GoalLedger,
    aggregator: LeagueAggregator,
    tally: GlobalTally,
}

impl EventClassifier {
    pub fn new(rules: SignalRules, aggregator: LeagueAggregator) -> Self {
        Self {
            rules,
            tracker: MatchStateTracker::new(),
            ledger: GoalLedger::new(),
            aggregator,
            tally: GlobalTally::default(),
        }
    }

    /// Seed league counters from stored rows.
    ///
    /// In `GlobalTotal` mode the red total continues from the largest stored
    /// `no_goals`, since that is the last global total written.
    pub fn hydrate(&mut self, rows: Vec<(String, LeagueStats)>) {
        if self.rules.no_goals_mode == NoGoalsMode::GlobalTotal {
            let stored_total = rows.iter().map(|(_, stats)| stats.no_goals).max().unwrap_or(0);
            self.tally.red_count = self.tally.red_count.max(stored_total);
        }
        self.aggregator.hydrate(rows);
    }

    /// Apply every rule to `update` and return the notices it produced
    pub fn classify(&mut self, update: &MatchUpdate) -> Vec<Notice> {
        let (Some(home_team), Some(away_team)) = (update.home_team(), update.away_team()) else {
            warn!(
                event_key = update.event_key().unwrap_or("-"),
                league = update.league(),
                "Skipping record without both team names"
            );
            return Vec::new();
        };

        let league = update.league();
        let ctx = RecordContext {
            key: self.rules.match_identity.key(league, home_team, away_team),
            league,
            home_team,
            away_team,
        };
        self.tracker
            .observe_half(&ctx.key, Half::from_info_time(update.info_time()));

        let mut notices = Vec::new();
        self.half_time_rule(update, &ctx, &mut notices);
        self.goal_rule(update, &ctx, &mut notices);
        self.signal_rule(update, &ctx, &mut notices);
        self.finish_rule(update, &ctx, &mut notices);
        notices
    }

    fn half_time_rule(&mut self, update: &MatchUpdate, ctx: &RecordContext, notices: &mut Vec<Notice>) {
        if update.is_half_time() && self.tracker.mark_half_time_notice(&ctx.key) {
            info!(match_key = %ctx.key, "Signalled match reached half time");
            notices.push(Notice::HalfTimeFollowUp {
                match_key: ctx.key.clone(),
            });
        }
    }

    fn goal_rule(&mut self, update: &MatchUpdate, ctx: &RecordContext, notices: &mut Vec<Notice>) {
        let Some(event_key) = update.event_key() else {
            return;
        };
        if self.ledger.contains(event_key) {
            return;
        }
        let Some(score) = update.final_result() else {
            return;
        };
        let Some(goal) = update.goalscorers().first() else {
            return;
        };
        let Some(scorer) = goal.scorer_name() else {
            warn!(
                match_key = %ctx.key,
                event_key = event_key,
                "Goal entry without a scorer name, skipping"
            );
            return;
        };

        self.ledger.insert(event_key);

        if self.tracker.phase(&ctx.key) != MatchPhase::SignalSent {
            debug!(match_key = %ctx.key, event_key = event_key, "Goal outside a signal window");
            return;
        }

        let half = Half::from_info_time(goal.info_time());
        self.tracker.observe_half(&ctx.key, half);
        if !self.tracker.set_phase(&ctx.key, MatchPhase::Green) {
            return;
        }

        notices.push(Notice::Goal {
            scorer: scorer.to_string(),
            home_team: ctx.home_team.to_string(),
            away_team: ctx.away_team.to_string(),
            minute: goal.time().unwrap_or("?").to_string(),
            score: score.to_string(),
        });

        self.tally.record_green(half);
        let stats = self.aggregator.record_green(ctx.league, half);
        info!(
            match_key = %ctx.key,
            scorer = scorer,
            half = %half,
            league = ctx.league,
            first_half = stats.first_half,
            second_half = stats.second_half,
            "GREEN: goal after signal"
        );

        notices.push(Notice::SignalConfirmed {
            home_team: ctx.home_team.to_string(),
            away_team: ctx.away_team.to_string(),
        });
    }

    fn signal_rule(&mut self, update: &MatchUpdate, ctx: &RecordContext, notices: &mut Vec<Notice>) {
        if update.statistics().is_empty() {
            debug!(match_key = %ctx.key, "Record carries no statistics");
            return;
        }
        let Some(attacks) = update.find_statistic(&self.rules.dangerous_attacks_stat) else {
            return;
        };
        if self.tracker.has_signal(&ctx.key) {
            return;
        }
        let Some(minute) = update.status().and_then(parse_leading_int) else {
            return;
        };

        let home_attacks = attacks.home_value();
        let away_attacks = attacks.away_value();
        let crossed = home_attacks.is_some_and(|count| count >= minute)
            || away_attacks.is_some_and(|count| count >= minute);
        if !crossed {
            return;
        }

        let score = update.final_result().unwrap_or_default();
        if !self.tracker.record_signal(&ctx.key, score) {
            return;
        }

        let league_stats = self.aggregator.snapshot(ctx.league);
        info!(
            match_key = %ctx.key,
            league = ctx.league,
            minute = minute,
            home_attacks = ?home_attacks,
            away_attacks = ?away_attacks,
            score = score,
            "Signal raised"
        );

        notices.push(Notice::Signal {
            league: ctx.league.to_string(),
            home_team: ctx.home_team.to_string(),
            away_team: ctx.away_team.to_string(),
            home_attacks,
            away_attacks,
            score: score.to_string(),
            minute,
            league_stats,
        });
    }

    fn finish_rule(&mut self, update: &MatchUpdate, ctx: &RecordContext, notices: &mut Vec<Notice>) {
        if !update.is_finished() || self.tracker.phase(&ctx.key) != MatchPhase::SignalSent {
            return;
        }

        let final_score = update.final_result().unwrap_or_default();
        let snapshot = self.tracker.snapshot(&ctx.key).unwrap_or_default();

        if final_score != snapshot {
            if !self.tracker.set_phase(&ctx.key, MatchPhase::Green) {
                return;
            }
            // League counters only move on a scored goal
            let half = self.tracker.last_half(&ctx.key);
            self.tally.record_green(half);
            info!(
                match_key = %ctx.key,
                from = %snapshot,
                to = %final_score,
                half = %half,
                "GREEN: finished with a different score"
            );
            notices.push(Notice::Green {
                home_team: ctx.home_team.to_string(),
                away_team: ctx.away_team.to_string(),
            });
        } else {
            if !self.tracker.set_phase(&ctx.key, MatchPhase::Red) {
                return;
            }
            let red_total = self.tally.record_red();
            let no_goals = match self.rules.no_goals_mode {
                NoGoalsMode::GlobalTotal => red_total,
                NoGoalsMode::PerLeague => self.aggregator.snapshot(ctx.league).no_goals + 1,
            };
            let stats = self.aggregator.record_red(ctx.league, no_goals);
            info!(
                match_key = %ctx.key,
                score = %final_score,
                league = ctx.league,
                no_goals = stats.no_goals,
                red_total = red_total,
                "RED: finished without a goal after signal"
            );
            notices.push(Notice::Red {
                home_team: ctx.home_team.to_string(),
                away_team: ctx.away_team.to_string(),
            });
        }

        self.tracker.set_phase(&ctx.key, MatchPhase::Finished);
    }

    /// Match states; clone the handle to read them from another task
    pub fn tracker(&self) -> &MatchStateTracker {
        &self.tracker
    }

    pub fn tally(&self) -> GlobalTally {
        self.tally
    }

    pub fn aggregator(&self) -> &LeagueAggregator {
        &self.aggregator
    }

    pub fn ledger(&self) -> &GoalLedger {
        &self.ledger
    }
}
