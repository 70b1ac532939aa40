use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Database schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize database schema
///
/// Safe to run on every startup. Older databases that were created before
/// `no_goals` existed get the column added in place.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS match_stats (
            id INTEGER PRIMARY KEY,
            league_name TEXT NOT NULL,
            first_half INTEGER NOT NULL DEFAULT 0,
            second_half INTEGER NOT NULL DEFAULT 0,
            no_goals INTEGER DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    if !has_column(pool, "match_stats", "no_goals").await? {
        info!("Adding missing column match_stats.no_goals");
        sqlx::query("ALTER TABLE match_stats ADD COLUMN no_goals INTEGER DEFAULT 0")
            .execute(pool)
            .await?;
    }

    // A hand-edited legacy table may repeat a league; keep its newest row
    let collapsed = sqlx::query(
        "DELETE FROM match_stats WHERE rowid NOT IN \
         (SELECT MAX(rowid) FROM match_stats GROUP BY league_name)",
    )
    .execute(pool)
    .await?
    .rows_affected();
    if collapsed > 0 {
        warn!(rows = collapsed, "Removed duplicate league rows from match_stats");
    }

    // Upserts conflict on league_name
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_match_stats_league ON match_stats(league_name)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
    )
    .bind(SCHEMA_VERSION)
    .execute(pool)
    .await?;

    Ok(())
}

/// Check whether `table` already has `column`
async fn has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool> {
    let sql = format!("SELECT name FROM pragma_table_info('{}')", table);
    let columns = sqlx::query_as::<_, (String,)>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(columns.iter().any(|(name,)| name == column))
}

/// Get current schema version
pub async fn get_schema_version(pool: &SqlitePool) -> Result<Option<i32>> {
    let row = sqlx::query_as::<_, (i32,)>(
        "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(version,)| version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_schema_initialization_is_idempotent() {
        let pool = memory_pool().await;

        initialize_schema(&pool).await.unwrap();
        initialize_schema(&pool).await.unwrap();

        assert_eq!(get_schema_version(&pool).await.unwrap(), Some(SCHEMA_VERSION));
        assert!(has_column(&pool, "match_stats", "no_goals").await.unwrap());
    }

    #[tokio::test]
    async fn test_legacy_table_gets_no_goals_column() {
        let pool = memory_pool().await;

        sqlx::query(
            r#"
            CREATE TABLE match_stats (
                id INTEGER PRIMARY KEY,
                league_name TEXT,
                first_half INTEGER,
                second_half INTEGER
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO match_stats (league_name, first_half, second_half) VALUES ('Serie A', 2, 1)")
            .execute(&pool)
            .await
            .unwrap();

        initialize_schema(&pool).await.unwrap();

        let (no_goals,) = sqlx::query_as::<_, (i64,)>(
            "SELECT no_goals FROM match_stats WHERE league_name = 'Serie A'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(no_goals, 0);
    }

    #[tokio::test]
    async fn test_duplicate_league_rows_are_collapsed() {
        let pool = memory_pool().await;

        sqlx::query(
            r#"
            CREATE TABLE match_stats (
                id INTEGER PRIMARY KEY,
                league_name TEXT NOT NULL,
                first_half INTEGER NOT NULL DEFAULT 0,
                second_half INTEGER NOT NULL DEFAULT 0,
                no_goals INTEGER DEFAULT 0
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        for (first_half, no_goals) in [(1, 0), (3, 2)] {
            sqlx::query("INSERT INTO match_stats (league_name, first_half, no_goals) VALUES ('Serie A', ?, ?)")
                .bind(first_half)
                .bind(no_goals)
                .execute(&pool)
                .await
                .unwrap();
        }

        initialize_schema(&pool).await.unwrap();

        let rows = sqlx::query_as::<_, (i64, i64)>(
            "SELECT first_half, no_goals FROM match_stats WHERE league_name = 'Serie A'",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(rows, vec![(3, 2)]);
    }
}
