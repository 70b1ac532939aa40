//! Feed record models
//!
//! Shapes of the live-events feed. Every field is optional on the wire; the
//! accessors below treat missing, null and empty strings the same way.

use serde::{Deserialize, Deserializer};

/// League name used when a record carries none
pub const UNKNOWN_LEAGUE: &str = "Unknown";

/// Status marking the interval
pub const STATUS_HALF_TIME: &str = "Half Time";

/// Status marking the end of a match
pub const STATUS_FINISHED: &str = "Finished";

/// One match update from a feed batch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchUpdate {
    #[serde(rename = "event_home_team", default)]
    pub home_team: Option<String>,
    #[serde(rename = "event_away_team", default)]
    pub away_team: Option<String>,
    #[serde(rename = "event_status", default, deserialize_with = "string_or_number")]
    pub status: Option<String>,
    #[serde(default)]
    pub league_name: Option<String>,
    #[serde(rename = "event_final_result", default)]
    pub final_result: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub event_key: Option<String>,
    #[serde(default)]
    pub info_time: Option<String>,
    #[serde(default)]
    pub goalscorers: Option<Vec<GoalScorer>>,
    #[serde(default)]
    pub statistics: Option<Vec<Statistic>>,
}

/// Goal entry attached to a match update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalScorer {
    #[serde(default)]
    pub home_scorer: Option<String>,
    #[serde(default)]
    pub away_scorer: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub time: Option<String>,
    #[serde(default)]
    pub info_time: Option<String>,
}

/// Named statistic with per-side values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Statistic {
    #[serde(rename = "type", default)]
    pub stat_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub home: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub away: Option<String>,
}

impl MatchUpdate {
    pub fn home_team(&self) -> Option<&str> {
        present(&self.home_team)
    }

    pub fn away_team(&self) -> Option<&str> {
        present(&self.away_team)
    }

    pub fn status(&self) -> Option<&str> {
        present(&self.status)
    }

    pub fn final_result(&self) -> Option<&str> {
        present(&self.final_result)
    }

    pub fn event_key(&self) -> Option<&str> {
        present(&self.event_key)
    }

    pub fn info_time(&self) -> Option<&str> {
        present(&self.info_time)
    }

    pub fn league(&self) -> &str {
        present(&self.league_name).unwrap_or(UNKNOWN_LEAGUE)
    }

    pub fn goalscorers(&self) -> &[GoalScorer] {
        self.goalscorers.as_deref().unwrap_or_default()
    }

    pub fn statistics(&self) -> &[Statistic] {
        self.statistics.as_deref().unwrap_or_default()
    }

    pub fn is_half_time(&self) -> bool {
        self.status() == Some(STATUS_HALF_TIME)
    }

    pub fn is_finished(&self) -> bool {
        self.status() == Some(STATUS_FINISHED)
    }

    /// Find a statistic by its exact type name
    pub fn find_statistic(&self, stat_type: &str) -> Option<&Statistic> {
        self.statistics()
            .iter()
            .find(|stat| stat.stat_type.as_deref() == Some(stat_type))
    }
}

impl GoalScorer {
    /// Home scorer if named, otherwise away scorer
    pub fn scorer_name(&self) -> Option<&str> {
        present(&self.home_scorer).or_else(|| present(&self.away_scorer))
    }

    pub fn time(&self) -> Option<&str> {
        present(&self.time)
    }

    pub fn info_time(&self) -> Option<&str> {
        present(&self.info_time)
    }
}

impl Statistic {
    pub fn home_value(&self) -> Option<u32> {
        self.home.as_deref().and_then(parse_leading_int)
    }

    pub fn away_value(&self) -> Option<u32> {
        self.away.as_deref().and_then(parse_leading_int)
    }
}

/// Parse the leading decimal digits of `s`, ignoring leading whitespace.
///
/// `"45+2"` reads as 45, `"Half Time"` reads as nothing.
pub fn parse_leading_int(s: &str) -> Option<u32> {
    let trimmed = s.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());

    if end == 0 {
        return None;
    }
    trimmed[..end].parse().ok()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

/// The feed sends some identifiers and counters as numbers and others as strings
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::Str(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_record() {
        let json = r#"{
            "event_key": 1181293,
            "event_home_team": "Flamengo",
            "event_away_team": "Palmeiras",
            "event_status": "37",
            "event_final_result": "1 - 0",
            "league_name": "Serie A",
            "info_time": "1st Half",
            "goalscorers": [
                {"time": "23", "home_scorer": "Pedro", "away_scorer": "", "info_time": "1st Half"}
            ],
            "statistics": [
                {"type": "Dangerous Attacks", "home": "41", "away": 18},
                {"type": "On Target", "home": "4", "away": "1"}
            ]
        }"#;

        let update: MatchUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.event_key(), Some("1181293"));
        assert_eq!(update.home_team(), Some("Flamengo"));
        assert_eq!(update.status(), Some("37"));
        assert_eq!(update.league(), "Serie A");
        assert_eq!(update.goalscorers()[0].scorer_name(), Some("Pedro"));

        let attacks = update.find_statistic("Dangerous Attacks").unwrap();
        assert_eq!(attacks.home_value(), Some(41));
        assert_eq!(attacks.away_value(), Some(18));
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let json = r#"{"event_home_team": "A", "goalscorers": null, "statistics": []}"#;
        let update: MatchUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(update.away_team(), None);
        assert_eq!(update.league(), UNKNOWN_LEAGUE);
        assert!(update.goalscorers().is_empty());
        assert!(update.statistics().is_empty());
        assert!(update.event_key().is_none());
    }

    #[test]
    fn test_scorer_falls_back_to_away() {
        let scorer = GoalScorer {
            home_scorer: Some(String::new()),
            away_scorer: Some("Suarez".to_string()),
            ..Default::default()
        };
        assert_eq!(scorer.scorer_name(), Some("Suarez"));

        let nobody = GoalScorer::default();
        assert_eq!(nobody.scorer_name(), None);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("10"), Some(10));
        assert_eq!(parse_leading_int(" 45+2"), Some(45));
        assert_eq!(parse_leading_int("90'"), Some(90));
        assert_eq!(parse_leading_int("Half Time"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-3"), None);
    }

    #[test]
    fn test_status_helpers() {
        let update = MatchUpdate {
            status: Some("Finished".to_string()),
            ..Default::default()
        };
        assert!(update.is_finished());
        assert!(!update.is_half_time());
    }
}
