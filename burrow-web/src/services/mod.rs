//! Service modules for catalog enrichment
//!
//! The outward-facing clients live behind traits so route handlers and
//! tests can swap in stubs.

pub mod audible_scraper;
pub mod metadata_cache;
pub mod openlibrary_client;

pub use audible_scraper::{AudibleScraper, AudiobookDetails, AudiobookSource, ScrapeError};
pub use metadata_cache::MetadataCache;
pub use openlibrary_client::{CatalogHit, CatalogLookup, FetchError, OpenLibraryClient};
