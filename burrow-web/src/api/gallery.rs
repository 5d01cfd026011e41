//! Artwork gallery endpoints
//!
//! Records only; byte storage and serving of the image files is handled
//! elsewhere.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::require_known_person;
use crate::db::artworks::{self, Artwork};
use crate::{ApiError, ApiResult, AppState};

/// Body of a gallery submission
#[derive(Debug, Deserialize)]
pub struct ArtworkSubmission {
    /// Name of the stored file
    pub filename: String,
    pub title: Option<String>,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
}

/// POST /api/gallery/:person
pub async fn submit_artwork(
    State(state): State<AppState>,
    Path(person): Path<String>,
    Json(submission): Json<ArtworkSubmission>,
) -> ApiResult<Json<Artwork>> {
    require_known_person(&state, &person)?;

    if submission.filename.trim().is_empty() {
        return Err(ApiError::BadRequest("Filename is required".to_string()));
    }

    let mut artwork = Artwork::new(&person, &submission.filename);
    artwork.title = submission.title;
    artwork.original_name = submission.original_name;
    artwork.mime_type = submission.mime_type;

    artworks::save_artwork(&state.db, &artwork).await?;

    Ok(Json(artwork))
}

/// GET /api/gallery/:person
///
/// That person's artwork records, newest first.
pub async fn list_gallery(
    State(state): State<AppState>,
    Path(person): Path<String>,
) -> ApiResult<Json<Vec<Artwork>>> {
    require_known_person(&state, &person)?;

    let rows = artworks::list_artworks(&state.db, &person).await?;
    Ok(Json(rows))
}
