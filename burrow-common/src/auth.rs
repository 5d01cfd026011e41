//! Upload key verification
//!
//! Write endpoints are gated by a single shared key supplied in the
//! `X-Upload-Key` request header. When no key is configured the gate is
//! open and every write is allowed.

/// Check a caller-supplied key against the configured one.
///
/// Returns true when writes are permitted. A configured key of `None`
/// disables gating entirely.
pub fn verify_upload_key(configured: Option<&str>, provided: Option<&str>) -> bool {
    match configured {
        None => true,
        Some(expected) => provided == Some(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_configured_allows_all() {
        assert!(verify_upload_key(None, None));
        assert!(verify_upload_key(None, Some("anything")));
    }

    #[test]
    fn test_matching_key_allows() {
        assert!(verify_upload_key(Some("hunter2"), Some("hunter2")));
    }

    #[test]
    fn test_wrong_key_rejects() {
        assert!(!verify_upload_key(Some("hunter2"), Some("hunter3")));
    }

    #[test]
    fn test_missing_key_rejects_when_configured() {
        assert!(!verify_upload_key(Some("hunter2"), None));
    }

    #[test]
    fn test_empty_provided_key_rejects() {
        assert!(!verify_upload_key(Some("hunter2"), Some("")));
    }
}
