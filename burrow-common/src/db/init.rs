//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently. Every `CREATE TABLE IF NOT EXISTS` is safe to re-run
//! against an existing database.

use crate::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL allows concurrent readers while a review is being written
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables on an existing pool (idempotent)
///
/// Split out from [`init_database`] so tests can run the schema against
/// an in-memory pool.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_reviews_table(pool).await?;
    create_book_metadata_table(pool).await?;
    create_audiobook_reviews_table(pool).await?;
    create_artworks_table(pool).await?;
    create_site_counter_table(pool).await?;

    Ok(())
}

/// Create the reviews table
///
/// One row per (person, book_slug) pair; writing the same book again
/// updates the existing row.
async fn create_reviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            guid TEXT PRIMARY KEY,
            person TEXT NOT NULL,
            book_slug TEXT NOT NULL,
            title TEXT NOT NULL,
            author TEXT,
            finished_date TEXT,
            rating INTEGER,
            review_text TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (person, book_slug),
            CHECK (rating IS NULL OR (rating >= 1 AND rating <= 10))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_person ON reviews(person)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_slug ON reviews(book_slug)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the book_metadata table
///
/// Cached catalog lookups keyed by slug, shared across reviewers.
async fn create_book_metadata_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS book_metadata (
            guid TEXT PRIMARY KEY,
            book_slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            author TEXT,
            cover_url TEXT,
            summary TEXT,
            source TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_book_metadata_slug ON book_metadata(book_slug)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the audiobook_reviews table
///
/// Retailer metadata is denormalized onto the review row; a failed
/// scrape leaves those columns NULL.
async fn create_audiobook_reviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audiobook_reviews (
            guid TEXT PRIMARY KEY,
            person TEXT NOT NULL,
            audible_url TEXT,
            listened_date TEXT,
            rating INTEGER,
            review_text TEXT,
            title TEXT,
            author TEXT,
            narrator TEXT,
            release_date TEXT,
            synopsis TEXT,
            cover_url TEXT,
            source TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (rating IS NULL OR (rating >= 1 AND rating <= 10))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_audiobook_reviews_person ON audiobook_reviews(person)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the artworks table
async fn create_artworks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artworks (
            guid TEXT PRIMARY KEY,
            person TEXT NOT NULL,
            title TEXT,
            filename TEXT NOT NULL,
            original_name TEXT,
            mime_type TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artworks_person ON artworks(person)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the site_counter table and seed the single row
async fn create_site_counter_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_counter (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            visits INTEGER NOT NULL DEFAULT 0,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Seed the counter row so increments never race against creation
    sqlx::query("INSERT OR IGNORE INTO site_counter (id, visits) VALUES (1, 0)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("burrow.db");

        let pool = init_database(&db_path).await.unwrap();
        assert!(db_path.exists());

        // All five tables must exist
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
             ('reviews', 'book_metadata', 'audiobook_reviews', 'artworks', 'site_counter')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("burrow.db");

        let pool = init_database(&db_path).await.unwrap();
        drop(pool);
        let pool = init_database(&db_path).await.unwrap();

        // Counter row seeded exactly once
        let visits: i64 = sqlx::query_scalar("SELECT visits FROM site_counter WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(visits, 0);
    }

    #[tokio::test]
    async fn test_schema_on_memory_pool() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO reviews (guid, person, book_slug, title) VALUES ('g', 'mira', 'dune', 'Dune')")
            .execute(&pool)
            .await
            .unwrap();
    }
}
