use crate::domain::{LeagueStats, LeagueStatsStore, StoreError, StoreResult};
use async_trait::async_trait;
use stats_db::{DbLeagueStats, LeagueStatsDatabase};

impl From<stats_db::DatabaseError> for StoreError {
    fn from(e: stats_db::DatabaseError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

fn to_counter(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn to_league_stats(row: &DbLeagueStats) -> LeagueStats {
    LeagueStats {
        first_half: to_counter(row.first_half),
        second_half: to_counter(row.second_half),
        no_goals: to_counter(row.no_goals),
    }
}

#[async_trait]
impl LeagueStatsStore for LeagueStatsDatabase {
    async fn upsert(&self, league: &str, stats: LeagueStats) -> StoreResult<()> {
        self.upsert_league_stats(
            league,
            u64::from(stats.first_half),
            u64::from(stats.second_half),
            u64::from(stats.no_goals),
        )
        .await?;
        Ok(())
    }

    async fn get(&self, league: &str) -> StoreResult<Option<LeagueStats>> {
        let row = self.get_league_stats(league).await?;
        Ok(row.as_ref().map(to_league_stats))
    }

    async fn load_all(&self) -> StoreResult<Vec<(String, LeagueStats)>> {
        let rows = self.get_all_league_stats().await?;
        Ok(rows
            .iter()
            .map(|row| (row.league_name.clone(), to_league_stats(row)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_round_trip_through_store_contract() {
        let db = LeagueStatsDatabase::new("sqlite::memory:").await.unwrap();
        let stats = LeagueStats {
            first_half: 2,
            second_half: 5,
            no_goals: 1,
        };

        LeagueStatsStore::upsert(&db, "Eredivisie", stats).await.unwrap();

        assert_eq!(LeagueStatsStore::get(&db, "Eredivisie").await.unwrap(), Some(stats));
        assert_eq!(LeagueStatsStore::get(&db, "Ligue 1").await.unwrap(), None);
        assert_eq!(
            db.load_all().await.unwrap(),
            vec![("Eredivisie".to_string(), stats)]
        );
    }

    #[test]
    fn test_negative_counters_clamp_to_zero() {
        assert_eq!(to_counter(-4), 0);
        assert_eq!(to_counter(7), 7);
    }
}
