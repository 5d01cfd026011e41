//! Book review rows
//!
//! One row per (person, book slug) pair. A person re-reviewing a book
//! updates their opinion fields in place; the title/author snapshot
//! captured on first save is kept.

use anyhow::Result;
use burrow_common::sanitize::accept_rating;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One person's review of one book
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub guid: Uuid,
    pub person: String,
    pub book_slug: String,
    pub title: String,
    pub author: Option<String>,
    pub finished_date: Option<NaiveDate>,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
}

impl Review {
    pub fn new(person: &str, book_slug: &str, title: &str) -> Self {
        Self {
            guid: Uuid::new_v4(),
            person: person.to_string(),
            book_slug: book_slug.to_string(),
            title: title.to_string(),
            author: None,
            finished_date: None,
            rating: None,
            review_text: None,
        }
    }
}

/// Save a review, updating the opinion fields of an existing row for the
/// same (person, book slug) pair
///
/// Out-of-range ratings are stored as NULL rather than rejected.
pub async fn save_review(pool: &SqlitePool, review: &Review) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO reviews (
            guid, person, book_slug, title, author,
            finished_date, rating, review_text, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(person, book_slug) DO UPDATE SET
            finished_date = excluded.finished_date,
            rating = excluded.rating,
            review_text = excluded.review_text,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(review.guid.to_string())
    .bind(&review.person)
    .bind(&review.book_slug)
    .bind(&review.title)
    .bind(&review.author)
    .bind(review.finished_date)
    .bind(accept_rating(review.rating))
    .bind(&review.review_text)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one person's review of one book
pub async fn load_review(
    pool: &SqlitePool,
    person: &str,
    book_slug: &str,
) -> Result<Option<Review>> {
    let row = sqlx::query(
        r#"
        SELECT guid, person, book_slug, title, author,
               finished_date, rating, review_text
        FROM reviews
        WHERE person = ? AND book_slug = ?
        "#,
    )
    .bind(person)
    .bind(book_slug)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(review_from_row(&row)?)),
        None => Ok(None),
    }
}

/// List all of one person's reviews, most recently updated first
pub async fn list_reviews(pool: &SqlitePool, person: &str) -> Result<Vec<Review>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, person, book_slug, title, author,
               finished_date, rating, review_text
        FROM reviews
        WHERE person = ?
        ORDER BY updated_at DESC
        "#,
    )
    .bind(person)
    .fetch_all(pool)
    .await?;

    rows.iter().map(review_from_row).collect()
}

fn review_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Review> {
    let guid_str: String = row.get("guid");

    Ok(Review {
        guid: Uuid::parse_str(&guid_str)?,
        person: row.get("person"),
        book_slug: row.get("book_slug"),
        title: row.get("title"),
        author: row.get("author"),
        finished_date: row.get("finished_date"),
        rating: row.get("rating"),
        review_text: row.get("review_text"),
    })
}
