//! Shelf view endpoint
//!
//! The combined read path: cached catalog metadata for a book plus one
//! person's review of it, resolved in a single request.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::require_known_person;
use crate::db::metadata::BookMetadata;
use crate::db::reviews::{self, Review};
use crate::services::MetadataCache;
use crate::{ApiError, ApiResult, AppState};
use burrow_common::slug;

/// Query parameters for a shelf view
#[derive(Debug, Deserialize)]
pub struct ShelfQuery {
    pub title: String,
    pub author: Option<String>,
}

/// One book on a person's shelf
#[derive(Debug, Serialize)]
pub struct ShelfResponse {
    pub metadata: BookMetadata,
    pub review: Option<Review>,
}

/// GET /api/shelf/:person/:slug?title=...&author=...
///
/// The slug path segment must equal the normalized title; anything else
/// is a mis-addressed request, answered as not-found rather than served
/// under a slug that nothing links to.
pub async fn get_shelf_entry(
    State(state): State<AppState>,
    Path((person, slug_param)): Path<(String, String)>,
    Query(query): Query<ShelfQuery>,
) -> ApiResult<Json<ShelfResponse>> {
    require_known_person(&state, &person)?;

    if slug::normalize(&query.title) != slug_param {
        return Err(ApiError::NotFound(format!(
            "No book '{}' on this shelf",
            slug_param
        )));
    }

    let cache = MetadataCache::new(state.db.clone(), state.catalog.clone());
    let metadata = cache
        .get_or_refresh(&slug_param, &query.title, query.author.as_deref())
        .await?;

    let review = reviews::load_review(&state.db, &person, &slug_param).await?;

    Ok(Json(ShelfResponse { metadata, review }))
}
