//! Audiobook review rows
//!
//! Unlike book reviews these are row-keyed: every submission inserts a
//! new row, and the retailer metadata captured at submission time is
//! denormalized onto it. A failed scrape leaves those fields NULL.

use anyhow::Result;
use burrow_common::sanitize::accept_rating;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One listening-journal entry with whatever retailer metadata the
/// scrape produced
#[derive(Debug, Clone, Serialize)]
pub struct AudiobookReview {
    pub guid: Uuid,
    pub person: String,
    pub audible_url: Option<String>,
    pub listened_date: Option<NaiveDate>,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub narrator: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub synopsis: Option<String>,
    pub cover_url: Option<String>,
    pub source: Option<String>,
}

impl AudiobookReview {
    pub fn new(person: &str) -> Self {
        Self {
            guid: Uuid::new_v4(),
            person: person.to_string(),
            audible_url: None,
            listened_date: None,
            rating: None,
            review_text: None,
            title: None,
            author: None,
            narrator: None,
            release_date: None,
            synopsis: None,
            cover_url: None,
            source: None,
        }
    }
}

/// Insert a new audiobook review row
///
/// Out-of-range ratings are stored as NULL rather than rejected.
pub async fn save_audiobook_review(pool: &SqlitePool, review: &AudiobookReview) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audiobook_reviews (
            guid, person, audible_url, listened_date, rating, review_text,
            title, author, narrator, release_date, synopsis, cover_url, source
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(review.guid.to_string())
    .bind(&review.person)
    .bind(&review.audible_url)
    .bind(review.listened_date)
    .bind(accept_rating(review.rating))
    .bind(&review.review_text)
    .bind(&review.title)
    .bind(&review.author)
    .bind(&review.narrator)
    .bind(review.release_date)
    .bind(&review.synopsis)
    .bind(&review.cover_url)
    .bind(&review.source)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all of one person's audiobook reviews, newest first
pub async fn list_audiobook_reviews(
    pool: &SqlitePool,
    person: &str,
) -> Result<Vec<AudiobookReview>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, person, audible_url, listened_date, rating, review_text,
               title, author, narrator, release_date, synopsis, cover_url, source
        FROM audiobook_reviews
        WHERE person = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(person)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let guid_str: String = row.get("guid");

            Ok(AudiobookReview {
                guid: Uuid::parse_str(&guid_str)?,
                person: row.get("person"),
                audible_url: row.get("audible_url"),
                listened_date: row.get("listened_date"),
                rating: row.get("rating"),
                review_text: row.get("review_text"),
                title: row.get("title"),
                author: row.get("author"),
                narrator: row.get("narrator"),
                release_date: row.get("release_date"),
                synopsis: row.get("synopsis"),
                cover_url: row.get("cover_url"),
                source: row.get("source"),
            })
        })
        .collect()
}
