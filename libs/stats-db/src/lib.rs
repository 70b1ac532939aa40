//! Durable per-league signal counters
//!
//! SQLite-backed store for the `match_stats` table. One row per league,
//! written with insert-or-update semantics keyed by league name.

pub mod models;
pub mod schema;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

// Re-export main types
pub use models::DbLeagueStats;
pub use schema::{get_schema_version, initialize_schema};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Schema error: {0}")]
    SchemaError(#[from] schema::SchemaError),

    #[error("Counter out of range for league {league}: {value}")]
    CounterOutOfRange { league: String, value: u64 },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// League statistics database manager
pub struct LeagueStatsDatabase {
    pool: SqlitePool,
}

impl LeagueStatsDatabase {
    /// Create new database connection and initialize schema
    pub async fn new(db_url: &str) -> Result<Self> {
        info!("Connecting to database: {}", db_url);

        let in_memory = db_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every in-memory connection is its own database, so keep exactly one
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect_with(options)
            .await?;

        schema::initialize_schema(&pool).await?;

        info!("Database initialized successfully");

        Ok(Self { pool })
    }

    // ==================== LEAGUE STATS ====================

    /// Insert the league row or overwrite its counters if it already exists
    pub async fn upsert_league_stats(
        &self,
        league_name: &str,
        first_half: u64,
        second_half: u64,
        no_goals: u64,
    ) -> Result<()> {
        debug!(
            league = %league_name,
            first_half,
            second_half,
            no_goals,
            "Upserting league stats"
        );

        sqlx::query(
            r#"
            INSERT INTO match_stats (league_name, first_half, second_half, no_goals)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(league_name) DO UPDATE SET
                first_half = excluded.first_half,
                second_half = excluded.second_half,
                no_goals = excluded.no_goals
            "#,
        )
        .bind(league_name)
        .bind(to_db_counter(league_name, first_half)?)
        .bind(to_db_counter(league_name, second_half)?)
        .bind(to_db_counter(league_name, no_goals)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the counters for one league
    pub async fn get_league_stats(&self, league_name: &str) -> Result<Option<DbLeagueStats>> {
        let row = sqlx::query_as::<_, DbLeagueStats>(
            r#"
            SELECT id, league_name,
                   COALESCE(first_half, 0) AS first_half,
                   COALESCE(second_half, 0) AS second_half,
                   COALESCE(no_goals, 0) AS no_goals
            FROM match_stats
            WHERE league_name = ?
            "#,
        )
        .bind(league_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Get the counters for every league, ordered by name
    pub async fn get_all_league_stats(&self) -> Result<Vec<DbLeagueStats>> {
        let rows = sqlx::query_as::<_, DbLeagueStats>(
            r#"
            SELECT id, league_name,
                   COALESCE(first_half, 0) AS first_half,
                   COALESCE(second_half, 0) AS second_half,
                   COALESCE(no_goals, 0) AS no_goals
            FROM match_stats
            WHERE league_name IS NOT NULL
            ORDER BY league_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Number of leagues with a stored row
    pub async fn league_count(&self) -> Result<i64> {
        let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM match_stats")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // ==================== UTILITY ====================

    /// Get database pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close database connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn to_db_counter(league: &str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| DatabaseError::CounterOutOfRange {
        league: league.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_db() -> LeagueStatsDatabase {
        LeagueStatsDatabase::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_upsert_and_get_league_stats() {
        let db = create_test_db().await;

        db.upsert_league_stats("Premier League", 3, 1, 0).await.unwrap();

        let row = db.get_league_stats("Premier League").await.unwrap().unwrap();
        assert_eq!(row.league_name, "Premier League");
        assert_eq!(row.first_half, 3);
        assert_eq!(row.second_half, 1);
        assert_eq!(row.no_goals, 0);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_row() {
        let db = create_test_db().await;

        db.upsert_league_stats("La Liga", 1, 0, 0).await.unwrap();
        db.upsert_league_stats("La Liga", 1, 2, 4).await.unwrap();

        let row = db.get_league_stats("La Liga").await.unwrap().unwrap();
        assert_eq!((row.first_half, row.second_half, row.no_goals), (1, 2, 4));
        assert_eq!(db.league_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_league_is_none() {
        let db = create_test_db().await;
        assert!(db.get_league_stats("Nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_league_stats_sorted() {
        let db = create_test_db().await;

        db.upsert_league_stats("Serie A", 1, 0, 0).await.unwrap();
        db.upsert_league_stats("Bundesliga", 0, 1, 2).await.unwrap();

        let rows = db.get_all_league_stats().await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.league_name.as_str()).collect();
        assert_eq!(names, vec!["Bundesliga", "Serie A"]);
    }
}
