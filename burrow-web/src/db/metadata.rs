//! Book metadata cache rows
//!
//! One row per book slug, shared across every reviewer of that book.

use anyhow::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Cached catalog metadata for one book slug
#[derive(Debug, Clone, Serialize)]
pub struct BookMetadata {
    pub guid: Uuid,
    pub book_slug: String,
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub summary: Option<String>,
    pub source: Option<String>,
}

impl BookMetadata {
    /// Fresh unenriched record carrying the title/author snapshot
    pub fn new(book_slug: &str, title: &str, author: Option<&str>) -> Self {
        Self {
            guid: Uuid::new_v4(),
            book_slug: book_slug.to_string(),
            title: title.to_string(),
            author: author.map(str::to_string),
            cover_url: None,
            summary: None,
            source: None,
        }
    }

    /// A record counts as enriched once a cover or summary is present.
    ///
    /// Empty strings count as absent, so a row written from an all-empty
    /// lookup is retried on the next request.
    pub fn is_enriched(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());
        filled(&self.cover_url) || filled(&self.summary)
    }
}

/// Save metadata, replacing the enrichment fields of an existing row
/// for the same slug
pub async fn save_metadata(pool: &SqlitePool, metadata: &BookMetadata) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO book_metadata (
            guid, book_slug, title, author, cover_url, summary, source, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(book_slug) DO UPDATE SET
            title = excluded.title,
            author = excluded.author,
            cover_url = excluded.cover_url,
            summary = excluded.summary,
            source = excluded.source,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(metadata.guid.to_string())
    .bind(&metadata.book_slug)
    .bind(&metadata.title)
    .bind(&metadata.author)
    .bind(&metadata.cover_url)
    .bind(&metadata.summary)
    .bind(&metadata.source)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load metadata by slug
pub async fn load_metadata(pool: &SqlitePool, book_slug: &str) -> Result<Option<BookMetadata>> {
    let row = sqlx::query(
        r#"
        SELECT guid, book_slug, title, author, cover_url, summary, source
        FROM book_metadata
        WHERE book_slug = ?
        "#,
    )
    .bind(book_slug)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");

            Ok(Some(BookMetadata {
                guid: Uuid::parse_str(&guid_str)?,
                book_slug: row.get("book_slug"),
                title: row.get("title"),
                author: row.get("author"),
                cover_url: row.get("cover_url"),
                summary: row.get("summary"),
                source: row.get("source"),
            }))
        }
        None => Ok(None),
    }
}
