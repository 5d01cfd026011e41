//! Slug derivation for catalog titles
//!
//! The slug is the join key binding reading-list entries, stored reviews
//! and cached metadata. Every call site that turns a title into a slug
//! must go through [`normalize`]; a second, slightly different slugifier
//! would silently orphan rows.

/// Derive a URL-safe slug from a free-text title.
///
/// Lowercases, collapses every maximal run of characters outside
/// `[a-z0-9]` into a single `-`, and trims leading/trailing `-`.
/// Total and idempotent: any input produces a valid slug, and slugs map
/// to themselves.
///
/// # Examples
///
/// ```
/// use burrow_common::slug::normalize;
///
/// assert_eq!(normalize("The Chosen!"), "the-chosen");
/// assert_eq!(normalize("  A & B "), "a-b");
/// assert_eq!(normalize("Dune"), "dune");
/// ```
pub fn normalize(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}
