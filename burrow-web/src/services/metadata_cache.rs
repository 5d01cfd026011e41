//! Cached catalog metadata
//!
//! Sits between the shelf routes and the catalog client. Each slug is
//! fetched at most once: a record with a cover or summary on it is
//! served from the database without touching the network again.
//!
//! Two requests racing on the same unenriched slug may both fetch; the
//! last write wins, which is harmless because both fetched the same
//! title.

use crate::db::metadata::{self, BookMetadata};
use crate::services::openlibrary_client::CatalogLookup;
use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct MetadataCache {
    pool: SqlitePool,
    lookup: Arc<dyn CatalogLookup>,
}

impl MetadataCache {
    pub fn new(pool: SqlitePool, lookup: Arc<dyn CatalogLookup>) -> Self {
        Self { pool, lookup }
    }

    /// Return metadata for a slug, consulting the catalog when the
    /// stored record has no cover or summary yet
    ///
    /// Errors only on the initial row read/create. A failed lookup (or a
    /// failed write of its result) keeps the record as it was before the
    /// attempt, so a flaky upstream never breaks a shelf view.
    pub async fn get_or_refresh(
        &self,
        slug: &str,
        title: &str,
        author: Option<&str>,
    ) -> Result<BookMetadata> {
        let record = match metadata::load_metadata(&self.pool, slug).await? {
            Some(existing) if existing.is_enriched() => {
                debug!("Metadata cache hit for '{}'", slug);
                return Ok(existing);
            }
            Some(existing) => existing,
            None => {
                let fresh = BookMetadata::new(slug, title, author);
                metadata::save_metadata(&self.pool, &fresh).await?;
                fresh
            }
        };

        match self.refresh(&record, title, author).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                warn!("Metadata refresh failed for '{}': {}", slug, e);
                Ok(record)
            }
        }
    }

    /// Fetch enrichment fields and persist them onto the record
    ///
    /// An all-empty hit is persisted too: `source` and the row timestamp
    /// record that the catalog was asked, while the empty fields leave
    /// the record eligible for another attempt on the next request.
    async fn refresh(
        &self,
        record: &BookMetadata,
        title: &str,
        author: Option<&str>,
    ) -> Result<BookMetadata> {
        let hit = self.lookup.lookup(title, author).await?;

        let mut updated = record.clone();
        updated.cover_url = hit.cover_url;
        updated.summary = hit.summary;
        // The author given at submission time wins over the catalog's
        updated.author = record.author.clone().or(hit.author);
        updated.source = Some(self.lookup.source_name().to_string());

        metadata::save_metadata(&self.pool, &updated).await?;

        Ok(updated)
    }
}
