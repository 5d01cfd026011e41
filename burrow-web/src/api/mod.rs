//! HTTP API handlers for burrow-web

use crate::{ApiError, AppState};

pub mod audiobooks;
pub mod auth;
pub mod buildinfo;
pub mod gallery;
pub mod health;
pub mod reviews;
pub mod shelf;
pub mod visits;

pub use audiobooks::{list_audiobook_entries, submit_audiobook_entry};
pub use auth::upload_key_middleware;
pub use buildinfo::get_build_info;
pub use gallery::{list_gallery, submit_artwork};
pub use health::health_routes;
pub use reviews::{list_person_reviews, submit_review};
pub use shelf::get_shelf_entry;
pub use visits::record_visit;

/// Reject person names outside the configured family roster
///
/// An empty roster accepts any name.
pub(crate) fn require_known_person(state: &AppState, person: &str) -> Result<(), ApiError> {
    if state.persons.is_empty() || state.persons.iter().any(|p| p == person) {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Unknown person: {}", person)))
    }
}
