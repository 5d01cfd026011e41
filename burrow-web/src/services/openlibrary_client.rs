//! Open Library search client
//!
//! Looks up a book by title (and optional author) against the Open
//! Library search API and assembles cover URL and summary for the
//! metadata cache. Takes the first search result without ranking or
//! disambiguation; good enough for a family shelf, wrong editions are
//! corrected by hand.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const OPENLIBRARY_BASE_URL: &str = "https://openlibrary.org";
const COVERS_BASE_URL: &str = "https://covers.openlibrary.org";
const USER_AGENT: &str = "burrow/0.1.0 (family reading journal)";
const REQUEST_TIMEOUT_SECS: u64 = 8;

/// Catalog lookup errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Enrichment fields found for a title
///
/// Every field is optional; a search with zero results produces an
/// all-empty hit, which is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogHit {
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub summary: Option<String>,
}

/// Backend-agnostic catalog lookup.
///
/// The metadata cache calls this trait, never a concrete client, so
/// tests can count and script lookups.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Search the catalog for a title; zero results is `Ok` with an
    /// all-empty hit.
    async fn lookup(&self, title: &str, author: Option<&str>) -> Result<CatalogHit, FetchError>;

    /// Short identifier stored in the `source` column
    fn source_name(&self) -> &'static str;
}

/// Open Library search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

/// One document in the search response
#[derive(Debug, Deserialize)]
struct SearchDoc {
    /// Work key, e.g. "/works/OL893415W"
    key: Option<String>,
    /// Author names in display order
    author_name: Option<Vec<String>>,
    /// Numeric cover identifier for covers.openlibrary.org
    cover_i: Option<i64>,
}

/// Work detail response; only the description is interesting
#[derive(Debug, Deserialize)]
struct WorkResponse {
    description: Option<Description>,
}

/// The work `description` field is either a plain string or an object
/// wrapping one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(String),
    Wrapped { value: String },
}

impl Description {
    fn into_text(self) -> String {
        match self {
            Description::Text(text) => text,
            Description::Wrapped { value } => value,
        }
    }
}

/// Cover image URL for a numeric cover identifier (large size)
fn cover_url_from_id(cover_id: i64) -> String {
    format!("{}/b/id/{}-L.jpg", COVERS_BASE_URL, cover_id)
}

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
}

impl OpenLibraryClient {
    pub fn new() -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Run the search call and parse the response
    async fn search(&self, title: &str, author: Option<&str>) -> Result<SearchResponse, FetchError> {
        let url = format!("{}/search.json", OPENLIBRARY_BASE_URL);
        let mut query: Vec<(&str, &str)> = vec![("title", title), ("limit", "1")];
        if let Some(author) = author {
            query.push(("author", author));
        }

        tracing::debug!(title = %title, "Querying Open Library search API");

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Fetch the work detail page for a summary.
    ///
    /// Failure here must not discard the cover already obtained from
    /// the search doc, so errors degrade to `None`.
    async fn work_summary(&self, work_key: &str) -> Option<String> {
        let url = format!("{}{}.json", OPENLIBRARY_BASE_URL, work_key);

        tracing::debug!(work_key = %work_key, "Querying Open Library work detail");

        let response = match self.http_client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(
                    work_key = %work_key,
                    status = %response.status(),
                    "Work detail unavailable, leaving summary empty"
                );
                return None;
            }
            Err(e) => {
                tracing::debug!(work_key = %work_key, error = %e, "Work detail request failed");
                return None;
            }
        };

        match response.json::<WorkResponse>().await {
            Ok(work) => work.description.map(Description::into_text),
            Err(e) => {
                tracing::debug!(work_key = %work_key, error = %e, "Work detail parse failed");
                None
            }
        }
    }
}

#[async_trait]
impl CatalogLookup for OpenLibraryClient {
    async fn lookup(&self, title: &str, author: Option<&str>) -> Result<CatalogHit, FetchError> {
        let response = self.search(title, author).await?;

        let Some(doc) = response.docs.into_iter().next() else {
            tracing::debug!(title = %title, "Open Library search returned no results");
            return Ok(CatalogHit::default());
        };

        let mut hit = CatalogHit {
            author: doc.author_name.and_then(|names| names.into_iter().next()),
            cover_url: doc.cover_i.map(cover_url_from_id),
            summary: None,
        };

        if let Some(work_key) = doc.key.filter(|key| key.starts_with("/works/")) {
            hit.summary = self.work_summary(&work_key).await;
        }

        tracing::info!(
            title = %title,
            cover = hit.cover_url.is_some(),
            summary = hit.summary.is_some(),
            "Open Library lookup finished"
        );

        Ok(hit)
    }

    fn source_name(&self) -> &'static str {
        "openlibrary"
    }
}
