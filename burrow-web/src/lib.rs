//! burrow-web library - family reading journal service
//!
//! JSON API over the shared SQLite journal: book shelves with cached
//! catalog metadata, audiobook journals, artwork records, and the site
//! visit counter. Exposed as a library so integration tests can drive
//! the router directly.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod api;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use services::{AudiobookSource, CatalogLookup};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Catalog consulted when a shelf entry has no metadata yet
    pub catalog: Arc<dyn CatalogLookup>,
    /// Retailer page scraper for audiobook entries
    pub audiobooks: Arc<dyn AudiobookSource>,
    /// Upload key gating the write routes; None disables the gate
    pub upload_key: Option<String>,
    /// Family roster; empty accepts any person name
    pub persons: Arc<Vec<String>>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        catalog: Arc<dyn CatalogLookup>,
        audiobooks: Arc<dyn AudiobookSource>,
        upload_key: Option<String>,
        persons: Vec<String>,
    ) -> Self {
        Self {
            db,
            catalog,
            audiobooks,
            upload_key,
            persons: Arc::new(persons),
        }
    }
}

/// Build application router
///
/// Write routes pass the upload-key middleware; reads, the visit
/// counter, and /health do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    // Gated routes (require the upload key when one is configured)
    let gated = Router::new()
        .route("/api/reviews/:person", post(api::submit_review))
        .route("/api/audiobooks/:person", post(api::submit_audiobook_entry))
        .route("/api/gallery/:person", post(api::submit_artwork))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::upload_key_middleware,
        ));

    // Open routes
    let open = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/shelf/:person/:slug", get(api::get_shelf_entry))
        .route("/api/reviews/:person", get(api::list_person_reviews))
        .route("/api/audiobooks/:person", get(api::list_audiobook_entries))
        .route("/api/gallery/:person", get(api::list_gallery))
        .route("/api/visits", post(api::record_visit))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(gated)
        .merge(open)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
