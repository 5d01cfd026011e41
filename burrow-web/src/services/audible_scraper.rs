//! Audible product page scraper
//!
//! Fetches an audiobook detail page and pulls out title, author,
//! narrator, release date, synopsis and cover image URL. Extraction is
//! layered per field: the Audible-specific structural marker first,
//! then a fuzzy text-label scan. A field that cannot be found is left
//! absent; a partial record is a normal outcome, never an error.

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

// Audible rejects default HTTP client signatures; present a browser.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0";
const REQUEST_TIMEOUT_SECS: u64 = 8;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static H1_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap());

static ANCHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a(?:\s[^>]*)?>(.*?)</a>").unwrap());

static P_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());

static DATE_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2}-\d{2}-(?:\d{4}|\d{2}))\b").unwrap());

static COVER_IMG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img[^>]*class="[^"]*bc-image-inset-border[^"]*"[^>]*>"#).unwrap()
});

static SRC_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

static SUMMARY_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class="[^"]*(?:productPublisherSummary|publisher-summary)[^"]*""#).unwrap()
});

/// Scraper errors; a failed page yields no partial data
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Page returned status {0}")]
    PageUnavailable(u16),
}

/// Fields extracted from an audiobook detail page, all optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudiobookDetails {
    pub title: Option<String>,
    pub author: Option<String>,
    pub narrator: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub synopsis: Option<String>,
    pub cover_url: Option<String>,
}

/// Backend-agnostic audiobook page lookup.
///
/// Handlers call this trait, never the concrete scraper, so tests can
/// script outcomes.
#[async_trait]
pub trait AudiobookSource: Send + Sync {
    async fn fetch_details(&self, url: &str) -> Result<AudiobookDetails, ScrapeError>;

    /// Short identifier stored in the `source` column
    fn source_name(&self) -> &'static str;
}

/// Audible page scraper
pub struct AudibleScraper {
    http_client: reqwest::Client,
}

impl AudibleScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScrapeError::NetworkError(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl AudiobookSource for AudibleScraper {
    async fn fetch_details(&self, url: &str) -> Result<AudiobookDetails, ScrapeError> {
        tracing::debug!(url = %url, "Fetching audiobook page");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::PageUnavailable(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::NetworkError(e.to_string()))?;

        let details = extract_details(&html);
        tracing::info!(
            url = %url,
            title = details.title.is_some(),
            narrator = details.narrator.is_some(),
            cover = details.cover_url.is_some(),
            "Scraped audiobook page"
        );

        Ok(details)
    }

    fn source_name(&self) -> &'static str {
        "audible"
    }
}

/// Run every field extractor over a fetched page
pub fn extract_details(html: &str) -> AudiobookDetails {
    AudiobookDetails {
        title: extract_title(html),
        author: extract_labeled_field(html, "authorLabel", "By:"),
        narrator: extract_labeled_field(html, "narratorLabel", "Narrated by:"),
        release_date: extract_release_date(html),
        synopsis: extract_synopsis(html),
        cover_url: extract_cover_url(html),
    }
}

/// Product title from the page `<h1>`
fn extract_title(html: &str) -> Option<String> {
    let inner = H1_REGEX.captures(html)?.get(1)?;
    let text = clean_text(inner.as_str());
    (!text.is_empty()).then_some(text)
}

/// Author/narrator style field: labelled `<li>` class first, fuzzy
/// text-label scan second
fn extract_labeled_field(html: &str, class_marker: &str, label: &str) -> Option<String> {
    if let Some(block) = labeled_block(html, class_marker) {
        if let Some(value) = value_from_block(&block) {
            return Some(value);
        }
    }
    text_after_label(html, label)
}

/// Release date: locate the labelled text, then the MM-DD-YY(YY) token
/// inside it. An unparseable date stays absent, never guessed.
fn extract_release_date(html: &str) -> Option<NaiveDate> {
    let candidates = [
        labeled_block(html, "releaseDateLabel").map(|block| clean_text(&block)),
        text_after_label(html, "Release date:"),
    ];

    for text in candidates.into_iter().flatten() {
        if let Some(date) = parse_date_token(&text) {
            return Some(date);
        }
    }
    None
}

/// Publisher summary: paragraphs following the summary block marker
fn extract_synopsis(html: &str) -> Option<String> {
    let marker = SUMMARY_MARKER_REGEX.find(html)?;
    let window = window_after(html, marker.end(), 6000);

    // Skip the rest of the tag the class attribute sits in
    let content = match window.find('>') {
        Some(pos) => &window[pos + 1..],
        None => window,
    };
    let container_end = content.find("</div>").unwrap_or(content.len());
    let container = &content[..container_end];

    let paragraphs: Vec<String> = P_REGEX
        .captures_iter(container)
        .filter_map(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|text| !text.is_empty())
        .collect();

    if !paragraphs.is_empty() {
        return Some(paragraphs.join("\n\n"));
    }

    // Summary block without <p> markup
    let text = clean_text(container);
    (!text.is_empty()).then_some(text)
}

/// Cover image from the inset-bordered `<img>`
fn extract_cover_url(html: &str) -> Option<String> {
    let img_tag = COVER_IMG_REGEX.find(html)?.as_str();
    SRC_ATTR_REGEX
        .captures(img_tag)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_html_entities(m.as_str()))
}

/// Inner HTML of the `<li>` whose class list contains the marker
fn labeled_block(html: &str, class_marker: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)<li[^>]*class="[^"]*{}[^"]*"[^>]*>(.*?)</li>"#,
        regex::escape(class_marker)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Value inside a labelled block: anchor texts joined, else the text
/// after the label separator
fn value_from_block(block: &str) -> Option<String> {
    let anchors = anchor_texts(block);
    if !anchors.is_empty() {
        return Some(anchors.join(", "));
    }

    let text = clean_text(block);
    let value = match text.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => text.trim(),
    };
    (!value.is_empty()).then(|| value.to_string())
}

/// Fuzzy layer: case-insensitive label search anywhere in the page,
/// value taken from the container the label sits in
fn text_after_label(html: &str, label: &str) -> Option<String> {
    let pattern = format!("(?i){}", regex::escape(label));
    let re = Regex::new(&pattern).ok()?;
    let m = re.find(html)?;

    let window = window_after(html, m.end(), 400);
    let container_end = ["</li>", "</ul>", "</div>"]
        .iter()
        .filter_map(|close| window.find(close))
        .min()
        .unwrap_or(window.len());
    let container = &window[..container_end];

    let anchors = anchor_texts(container);
    if !anchors.is_empty() {
        return Some(anchors.join(", "));
    }

    let text = clean_text(container);
    let value = text.trim_start_matches(':').trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// First MM-DD-YYYY or MM-DD-YY token parsed as a date
fn parse_date_token(text: &str) -> Option<NaiveDate> {
    let token = DATE_TOKEN_REGEX.find(text)?.as_str();
    // "MM-DD-YYYY" is 10 chars; anything shorter carries a 2-digit year
    let format = if token.len() == 10 { "%m-%d-%Y" } else { "%m-%d-%y" };
    NaiveDate::parse_from_str(token, format).ok()
}

/// Window into the page after a match, clipped to a char boundary
fn window_after(html: &str, start: usize, max_len: usize) -> &str {
    let mut end = (start + max_len).min(html.len());
    while !html.is_char_boundary(end) {
        end -= 1;
    }
    &html[start..end]
}

/// Non-empty anchor texts within a fragment, document order
fn anchor_texts(fragment: &str) -> Vec<String> {
    ANCHOR_REGEX
        .captures_iter(fragment)
        .filter_map(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Strip tags, decode entities, collapse whitespace
fn clean_text(fragment: &str) -> String {
    let stripped = TAG_REGEX.replace_all(fragment, " ");
    let decoded = decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode common HTML entities
fn decode_html_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><body>
        <h1 class="bc-heading bc-color-base" slot="title">Project Hail Mary</h1>
        <ul class="bc-list">
          <li class="bc-list-item authorLabel">
            <span class="bc-text">By:</span>
            <a class="bc-link" href="/author/B002XLHS8Q">Andy Weir</a>
          </li>
          <li class="bc-list-item narratorLabel">
            <span class="bc-text">Narrated by:</span>
            <a class="bc-link" href="/search?searchNarrator=Ray+Porter">Ray Porter</a>
          </li>
          <li class="bc-list-item releaseDateLabel">
            <span class="bc-text">Release date: 05-04-21</span>
          </li>
        </ul>
        <img id="cover" class="bc-pub-block bc-image-inset-border js-only-element"
             src="https://m.media-amazon.com/images/I/91vS2L5YfEL._SL500_.jpg" alt="cover">
        <div class="bc-container productPublisherSummary">
          <div class="bc-section">
            <p>Ryland Grace is the sole survivor on a desperate, last-chance mission.</p>
            <p>Except that right now, he doesn't know that.</p>
          </div>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_full_page_extraction() {
        let details = extract_details(FULL_PAGE);

        assert_eq!(details.title.as_deref(), Some("Project Hail Mary"));
        assert_eq!(details.author.as_deref(), Some("Andy Weir"));
        assert_eq!(details.narrator.as_deref(), Some("Ray Porter"));
        assert_eq!(details.release_date, NaiveDate::from_ymd_opt(2021, 5, 4));
        assert_eq!(
            details.cover_url.as_deref(),
            Some("https://m.media-amazon.com/images/I/91vS2L5YfEL._SL500_.jpg")
        );

        let synopsis = details.synopsis.unwrap();
        assert!(synopsis.contains("sole survivor"));
        assert!(synopsis.contains("he doesn't know that"));
    }

    #[test]
    fn test_multiple_authors_joined() {
        let html = r#"
            <li class="authorLabel">
              <span>By:</span>
              <a href="/a">Terry Pratchett</a>, <a href="/b">Neil Gaiman</a>
            </li>
        "#;
        assert_eq!(
            extract_labeled_field(html, "authorLabel", "By:").as_deref(),
            Some("Terry Pratchett, Neil Gaiman")
        );
    }

    #[test]
    fn test_fuzzy_label_with_anchor() {
        // No Audible classes at all; the text label still locates the value
        let html = r##"<div><span>By:</span> <a href="#">Frank Herbert</a></div>"##;
        assert_eq!(
            extract_labeled_field(html, "authorLabel", "By:").as_deref(),
            Some("Frank Herbert")
        );
    }

    #[test]
    fn test_fuzzy_label_plain_text() {
        let html = "<ul><li>Narrated by: Scott Brick</li></ul>";
        assert_eq!(
            extract_labeled_field(html, "narratorLabel", "Narrated by:").as_deref(),
            Some("Scott Brick")
        );
    }

    #[test]
    fn test_scan_window_clips_to_char_boundary() {
        // Multibyte text running past the window edge must not panic
        let html = format!("<div>Narrated by: {}</div>", "é".repeat(400));
        let narrator = extract_labeled_field(&html, "narratorLabel", "Narrated by:");
        assert!(narrator.unwrap().starts_with('é'));
    }

    #[test]
    fn test_labeled_block_without_anchor_splits_on_colon() {
        let html = r#"<li class="narratorLabel"><span>Narrated by: Ray Porter</span></li>"#;
        assert_eq!(
            extract_labeled_field(html, "narratorLabel", "Narrated by:").as_deref(),
            Some("Ray Porter")
        );
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let html = "<html><body><p>Nothing useful here.</p></body></html>";
        let details = extract_details(html);

        assert_eq!(details.title, None);
        assert_eq!(details.author, None);
        assert_eq!(details.narrator, None);
        assert_eq!(details.release_date, None);
        assert_eq!(details.cover_url, None);
    }

    #[test]
    fn test_partial_record_is_normal() {
        let html = "<h1>The Martian</h1>";
        let details = extract_details(html);

        assert_eq!(details.title.as_deref(), Some("The Martian"));
        assert_eq!(details.narrator, None);
        assert_eq!(details.cover_url, None);
    }

    #[test]
    fn test_release_date_four_digit_year() {
        let html = r#"<li class="releaseDateLabel">Release date: 11-02-2017</li>"#;
        assert_eq!(
            extract_release_date(html),
            NaiveDate::from_ymd_opt(2017, 11, 2)
        );
    }

    #[test]
    fn test_release_date_two_digit_year() {
        let html = "Release date: 05-04-21";
        assert_eq!(
            extract_release_date(html),
            NaiveDate::from_ymd_opt(2021, 5, 4)
        );
    }

    #[test]
    fn test_unparseable_date_stays_absent() {
        assert_eq!(extract_release_date("Release date: soon"), None);
        // Token shaped right but not a real date
        assert_eq!(extract_release_date("Release date: 13-45-21"), None);
    }

    #[test]
    fn test_title_entities_decoded() {
        let html = "<h1>Good Omens &amp; Other Stories</h1>";
        assert_eq!(
            extract_title(html).as_deref(),
            Some("Good Omens & Other Stories")
        );
    }

    #[test]
    fn test_cover_requires_inset_class() {
        let html = r#"<img class="nav-logo" src="https://example.com/logo.png">"#;
        assert_eq!(extract_cover_url(html), None);
    }

    #[test]
    fn test_synopsis_without_paragraph_markup() {
        let html = r#"<div class="publisher-summary">A quiet story about bees.</div>"#;
        assert_eq!(
            extract_synopsis(html).as_deref(),
            Some("A quiet story about bees.")
        );
    }

    #[test]
    fn test_summary_marker_at_end_of_page() {
        // Truncated page: the marker matches but nothing follows it
        let html = r#"<div class="productPublisherSummary""#;
        assert_eq!(extract_synopsis(html), None);
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  <b>Ray</b>\n   Porter  "),
            "Ray Porter".to_string()
        );
    }
}
