//! Audiobook journal endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::api::require_known_person;
use crate::db::audiobooks::{self, AudiobookReview};
use crate::{ApiResult, AppState};
use burrow_common::sanitize::{accept_rating, parse_user_date};

/// Body of an audiobook journal submission
#[derive(Debug, Deserialize)]
pub struct AudiobookSubmission {
    pub audible_url: Option<String>,
    /// `YYYY-MM-DD`; anything else is stored as no date
    pub listened_date: Option<String>,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
}

/// POST /api/audiobooks/:person
///
/// Inserts a new journal entry. When the body carries an Audible URL
/// the product page is scraped for title/author/narrator and friends;
/// a failed scrape inserts the entry without them.
pub async fn submit_audiobook_entry(
    State(state): State<AppState>,
    Path(person): Path<String>,
    Json(submission): Json<AudiobookSubmission>,
) -> ApiResult<Json<AudiobookReview>> {
    require_known_person(&state, &person)?;

    let mut review = AudiobookReview::new(&person);
    review.listened_date = parse_user_date(submission.listened_date.as_deref());
    // Dropped here as well as in the store so the response mirrors the row
    review.rating = accept_rating(submission.rating);
    review.review_text = submission.review_text;
    review.audible_url = submission
        .audible_url
        .filter(|url| !url.trim().is_empty());

    if let Some(url) = review.audible_url.clone() {
        match state.audiobooks.fetch_details(&url).await {
            Ok(details) => {
                review.title = details.title;
                review.author = details.author;
                review.narrator = details.narrator;
                review.release_date = details.release_date;
                review.synopsis = details.synopsis;
                review.cover_url = details.cover_url;
                review.source = Some(state.audiobooks.source_name().to_string());
            }
            Err(e) => {
                warn!(
                    "Audiobook details unavailable for {}: {}; saving entry without them",
                    url, e
                );
            }
        }
    }

    audiobooks::save_audiobook_review(&state.db, &review).await?;

    Ok(Json(review))
}

/// GET /api/audiobooks/:person
///
/// That person's audiobook journal, newest first.
pub async fn list_audiobook_entries(
    State(state): State<AppState>,
    Path(person): Path<String>,
) -> ApiResult<Json<Vec<AudiobookReview>>> {
    require_known_person(&state, &person)?;

    let rows = audiobooks::list_audiobook_reviews(&state.db, &person).await?;
    Ok(Json(rows))
}
