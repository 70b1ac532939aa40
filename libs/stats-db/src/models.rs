use serde::{Deserialize, Serialize};

/// Database representation of one league's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DbLeagueStats {
    pub id: i64,
    pub league_name: String,
    pub first_half: i64,
    pub second_half: i64,
    pub no_goals: i64,
}
