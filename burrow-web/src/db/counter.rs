//! Site visit counter
//!
//! A single pre-seeded row; each visit bumps it and returns the new
//! total in the same statement.

use anyhow::Result;
use sqlx::SqlitePool;

/// Increment the visit counter and return the new total
pub async fn increment_visits(pool: &SqlitePool) -> Result<i64> {
    let visits: i64 = sqlx::query_scalar(
        r#"
        UPDATE site_counter
        SET visits = visits + 1, updated_at = CURRENT_TIMESTAMP
        WHERE id = 1
        RETURNING visits
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(visits)
}
