//! Book review endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::require_known_person;
use crate::db::reviews::{self, Review};
use crate::{ApiError, ApiResult, AppState};
use burrow_common::sanitize::parse_user_date;
use burrow_common::slug;

/// Body of a review submission
#[derive(Debug, Deserialize)]
pub struct ReviewSubmission {
    pub title: String,
    pub author: Option<String>,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
    /// `YYYY-MM-DD`; anything else is stored as no date
    pub finished_date: Option<String>,
}

/// POST /api/reviews/:person
///
/// Upserts the person's review of the book named in the body. A repeat
/// submission updates rating/text/date in place and keeps the
/// title/author snapshot from the first save.
pub async fn submit_review(
    State(state): State<AppState>,
    Path(person): Path<String>,
    Json(submission): Json<ReviewSubmission>,
) -> ApiResult<Json<Review>> {
    require_known_person(&state, &person)?;

    let book_slug = slug::normalize(&submission.title);
    if book_slug.is_empty() {
        return Err(ApiError::BadRequest(
            "Title must contain at least one letter or digit".to_string(),
        ));
    }

    let mut review = Review::new(&person, &book_slug, &submission.title);
    review.author = submission.author;
    review.rating = submission.rating;
    review.review_text = submission.review_text;
    review.finished_date = parse_user_date(submission.finished_date.as_deref());

    reviews::save_review(&state.db, &review).await?;

    // Read back the stored row: rating bounds and any preserved snapshot
    // from an earlier submission are applied by the store
    let stored = reviews::load_review(&state.db, &person, &book_slug)
        .await?
        .ok_or_else(|| ApiError::Internal("Review missing after save".to_string()))?;

    Ok(Json(stored))
}

/// GET /api/reviews/:person
///
/// That person's reviews, most recently updated first.
pub async fn list_person_reviews(
    State(state): State<AppState>,
    Path(person): Path<String>,
) -> ApiResult<Json<Vec<Review>>> {
    require_known_person(&state, &person)?;

    let rows = reviews::list_reviews(&state.db, &person).await?;
    Ok(Json(rows))
}
